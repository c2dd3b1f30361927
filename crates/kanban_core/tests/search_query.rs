use chrono::NaiveDate;
use kanban_core::query::view::matching_tasks;
use kanban_core::{
    filter_board, parse_query, BoardConfig, BoardState, BoardStore, ColumnId, Priority,
    TaskInput, TaskPredicate,
};

fn reference_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()
}

fn predicate(raw: &str) -> TaskPredicate {
    TaskPredicate::new(parse_query(raw), reference_day())
}

fn titles(state: &BoardState, raw: &str) -> Vec<String> {
    let mut found: Vec<String> = matching_tasks(state, &predicate(raw))
        .into_iter()
        .map(|task| task.title.clone())
        .collect();
    found.sort();
    found
}

fn board() -> BoardState {
    let mut store = BoardStore::new(BoardState::empty(), BoardConfig::default());
    store.create_task(
        &TaskInput::new("Hotfix login", Priority::High, 180).with_tags(["urgent", "auth"]),
    );
    store.create_task(&TaskInput::new("Tune cache", Priority::High, 60).with_tags(["urgent"]));
    store.create_task(
        &TaskInput::new("Plan offsite", Priority::Low, 240)
            .with_tags(["urgent"])
            .with_description("Book the venue"),
    );
    store.create_task(
        &TaskInput::new("Exact estimate", Priority::High, 120)
            .with_tags(["URGENT"])
            .with_status(ColumnId::Doing),
    );
    store.create_task(&TaskInput::new("Due today", Priority::Medium, 10).with_due_at("2026-05-10"));
    store.create_task(&TaskInput::new("Due in seven", Priority::Medium, 10).with_due_at("2026-05-17"));
    store.create_task(&TaskInput::new("Due in eight", Priority::Medium, 10).with_due_at("2026-05-18"));
    store.create_task(
        &TaskInput::new("Due yesterday", Priority::Medium, 10).with_due_at("2026-05-09"),
    );
    store.create_task(
        &TaskInput::new("Timestamp due", Priority::Medium, 10).with_due_at("2026-05-12T09:30"),
    );
    store.into_state()
}

#[test]
fn combined_tag_priority_and_estimation_filters() {
    let state = board();
    assert_eq!(
        titles(&state, "tag:urgent p:high est:>=120"),
        vec!["Exact estimate", "Hotfix login"]
    );
}

#[test]
fn due_week_includes_today_and_seventh_day_only() {
    let state = board();
    assert_eq!(
        titles(&state, "due:week"),
        vec!["Due in seven", "Due today", "Timestamp due"]
    );
}

#[test]
fn due_overdue_is_strictly_before_today() {
    let state = board();
    assert_eq!(titles(&state, "due:overdue"), vec!["Due yesterday"]);
}

#[test]
fn free_text_searches_title_and_description() {
    let state = board();
    assert_eq!(titles(&state, "VENUE"), vec!["Plan offsite"]);
    assert_eq!(titles(&state, "due in"), vec!["Due in eight", "Due in seven"]);
}

#[test]
fn tags_combine_with_and() {
    let state = board();
    assert_eq!(titles(&state, "tag:urgent tag:AUTH"), vec!["Hotfix login"]);
}

#[test]
fn estimation_operators() {
    let state = board();
    assert_eq!(titles(&state, "est:<60"), titles(&state, "est:10"));
    assert_eq!(titles(&state, "est:=240"), vec!["Plan offsite"]);
    assert_eq!(titles(&state, "est:>180"), vec!["Plan offsite"]);
    assert_eq!(titles(&state, "est:<=60").len(), 6);
}

#[test]
fn unknown_operators_are_reported_and_ignored() {
    let parsed = parse_query("status:done p:urgent login");
    assert_eq!(parsed.unknown_tokens, vec!["status:done", "p:urgent"]);
    assert_eq!(parsed.text, "login");
    assert!(parsed.priority.is_none());

    let state = board();
    assert_eq!(titles(&state, "status:done login"), vec!["Hotfix login"]);
}

#[test]
fn last_priority_token_wins() {
    let parsed = parse_query("p:low p:HIGH");
    assert_eq!(parsed.priority, Some(Priority::High));
}

#[test]
fn filtered_board_groups_by_column_with_totals() {
    let state = board();
    let views = filter_board(&state, &predicate("tag:urgent"));

    assert_eq!(views.len(), 3);
    assert_eq!(views[0].column, ColumnId::Todo);
    assert_eq!(views[0].len(), 3);
    assert_eq!(views[0].total_estimation(), 180 + 60 + 240);
    assert_eq!(views[1].column, ColumnId::Doing);
    assert_eq!(views[1].total_estimation(), 120);
    assert!(views[2].is_empty());
}

#[test]
fn empty_query_matches_everything() {
    let state = board();
    assert!(parse_query("   ").is_empty());
    assert_eq!(titles(&state, "").len(), state.tasks.len());
}
