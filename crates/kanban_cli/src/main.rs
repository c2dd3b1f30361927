//! Command-line inspection of board export documents.
//!
//! # Responsibility
//! - Validate, search, audit and review exported boards without a UI.
//! - Keep output plain text and deterministic for scripting.

use clap::{Parser, Subcommand};
use kanban_core::audit::report::{format_timestamp, DEFAULT_RECENT_LIMIT};
use kanban_core::config::DEFAULT_ERROR_DISPLAY_LIMIT;
use kanban_core::{
    capped_messages, default_log_level, diff_summary, filter_board, import_board, init_logging,
    parse_query, AuditAction, AuditFilter, AuditSummary, ImportOutcome, SupervisorSummary,
    TaskPredicate,
};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(about = "Inspect kanban board export documents")]
#[command(version)]
struct Cli {
    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for log files; logging is off without it
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print core version and health check
    Info,
    /// Validate an export document as an import would
    Check {
        file: PathBuf,
    },
    /// Filter tasks with the search mini-language
    Search {
        file: PathBuf,
        /// e.g. "tag:urgent p:high est:>=120 due:week"
        query: String,
    },
    /// Summarize the audit log
    Audit {
        file: PathBuf,

        /// Only CREATE|UPDATE|MOVE|DELETE events
        #[arg(short, long)]
        action: Option<String>,

        /// Task id fragment
        #[arg(short, long)]
        task: Option<String>,

        /// Recent events listed in the summary
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        recent: usize,
    },
    /// Supervisor review summary
    Review {
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli.command) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, String> {
    match command {
        Command::Info => {
            println!("kanban_core ping={}", kanban_core::ping());
            println!("kanban_core version={}", kanban_core::core_version());
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { file } => check(&file),
        Command::Search { file, query } => {
            let outcome = load(&file)?;
            search(&outcome, &query);
            Ok(ExitCode::SUCCESS)
        }
        Command::Audit {
            file,
            action,
            task,
            recent,
        } => {
            let outcome = load(&file)?;
            let action = action
                .map(|raw| {
                    AuditAction::parse(&raw)
                        .ok_or_else(|| format!("unknown action `{raw}`; expected CREATE|UPDATE|MOVE|DELETE"))
                })
                .transpose()?;
            let filter = AuditFilter {
                action,
                task_id_fragment: task.unwrap_or_default(),
            };
            audit(&outcome, &filter, recent);
            Ok(ExitCode::SUCCESS)
        }
        Command::Review { file } => {
            let outcome = load(&file)?;
            print!("{}", SupervisorSummary::from_board(&outcome.state).render());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_document(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("cannot read `{}`: {err}", path.display()))
}

fn load(path: &Path) -> Result<ImportOutcome, String> {
    let raw = read_document(path)?;
    import_board(&raw).map_err(|err| {
        let details = capped_messages(&err.messages(), DEFAULT_ERROR_DISPLAY_LIMIT).join("\n  ");
        format!("{err}\n  {details}")
    })
}

fn check(path: &Path) -> Result<ExitCode, String> {
    let raw = read_document(path)?;
    match import_board(&raw) {
        Ok(outcome) => {
            info!(
                "event=cli_check module=cli status=ok tasks={} regenerated={}",
                outcome.state.tasks.len(),
                outcome.regenerated
            );
            println!("{}", outcome.notice());
            println!(
                "tasks={} audit_events={}",
                outcome.state.tasks.len(),
                outcome.state.audit_log.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{err}");
            for message in capped_messages(&err.messages(), DEFAULT_ERROR_DISPLAY_LIMIT) {
                println!("  - {message}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn search(outcome: &ImportOutcome, raw_query: &str) {
    let predicate = TaskPredicate::for_today(parse_query(raw_query));
    for token in &predicate.query().unknown_tokens {
        println!("ignored unknown filter: {token}");
    }

    for view in filter_board(&outcome.state, &predicate) {
        println!(
            "[{}] {} task(s), {} min",
            view.column,
            view.len(),
            view.total_estimation()
        );
        for task in &view.tasks {
            let tags = if task.tags.is_empty() {
                String::new()
            } else {
                format!(" #{}", task.tags.join(" #"))
            };
            println!(
                "  {} ({}, {} min){tags}",
                task.title,
                task.priority.as_str(),
                task.estimation_min
            );
        }
    }
}

fn audit(outcome: &ImportOutcome, filter: &AuditFilter, recent: usize) {
    let events = filter.apply(&outcome.state.audit_log);
    let summary = AuditSummary::from_events(events.iter().copied(), recent);
    print!("{}", summary.render());

    println!();
    for event in events {
        println!(
            "{}  {:<6}  {}  {}",
            format_timestamp(&event.timestamp),
            event.action,
            event.task_id,
            diff_summary(event)
        );
    }
}
