//! Search query tokenizer.
//!
//! Grammar (whitespace-delimited tokens, ASCII case-insensitive):
//! - `tag:<name>` with `name` in `[a-z0-9_-]+`
//! - `p:<low|medium|high>`
//! - `due:<overdue|week>`
//! - `est:<op><n>` with `op` in `<, <=, >, >=, =` (bare number means `=`)
//! - any other token containing `:` is unknown
//! - everything else is free text

use crate::model::task::{normalize_tag, Priority};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^tag:([a-z0-9_-]+)$").expect("valid tag token regex"));
static PRIORITY_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^p:(low|medium|high)$").expect("valid priority token regex"));
static DUE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^due:(overdue|week)$").expect("valid due token regex"));
static EST_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^est:(<=|>=|<|>|=)?(\d+)$").expect("valid est token regex"));

/// Due-date window filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    /// Due strictly before today.
    Overdue,
    /// Due within `[today, today + 7 days]`.
    Week,
}

impl DueFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Week => "week",
        }
    }
}

/// Comparison operator of an `est:` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl EstOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "=",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "=" => Some(Self::Eq),
            _ => None,
        }
    }
}

/// Estimation filter, e.g. `est:>=120`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstFilter {
    pub op: EstOp,
    pub value: u64,
}

impl EstFilter {
    pub fn matches(&self, estimation_min: u32) -> bool {
        let value = u64::from(estimation_min);
        match self.op {
            EstOp::Lt => value < self.value,
            EstOp::Le => value <= self.value,
            EstOp::Gt => value > self.value,
            EstOp::Ge => value >= self.value,
            EstOp::Eq => value == self.value,
        }
    }
}

/// Structured form of a raw search string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub raw: String,
    /// Lowercased free-text fragment, space-joined.
    pub text: String,
    /// Required tags, lowercase, first-seen order, no duplicates.
    pub tags: Vec<String>,
    /// Last `p:` token wins.
    pub priority: Option<Priority>,
    pub due: Option<DueFilter>,
    pub est: Option<EstFilter>,
    /// Colon tokens that matched no operator.
    pub unknown_tokens: Vec<String>,
}

impl ParsedQuery {
    /// True when the query filters nothing.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.tags.is_empty()
            && self.priority.is_none()
            && self.due.is_none()
            && self.est.is_none()
    }
}

/// Parses a raw search string. Never fails; bad operators are reported in
/// [`ParsedQuery::unknown_tokens`].
pub fn parse_query(raw: &str) -> ParsedQuery {
    let mut parsed = ParsedQuery {
        raw: raw.to_string(),
        ..ParsedQuery::default()
    };
    let mut free_text: Vec<&str> = Vec::new();

    for token in raw.split_whitespace() {
        if let Some(tag) = parse_tag_token(token) {
            if !parsed.tags.contains(&tag) {
                parsed.tags.push(tag);
            }
            continue;
        }

        if let Some(priority) = parse_priority_token(token) {
            parsed.priority = Some(priority);
            continue;
        }

        if let Some(due) = parse_due_token(token) {
            parsed.due = Some(due);
            continue;
        }

        if let Some(est) = parse_est_token(token) {
            parsed.est = Some(est);
            continue;
        }

        if token.contains(':') {
            parsed.unknown_tokens.push(token.to_string());
            continue;
        }

        free_text.push(token);
    }

    parsed.text = free_text.join(" ").trim().to_lowercase();
    parsed
}

fn parse_tag_token(token: &str) -> Option<String> {
    let caps = TAG_TOKEN_RE.captures(token)?;
    normalize_tag(caps.get(1)?.as_str())
}

fn parse_priority_token(token: &str) -> Option<Priority> {
    let caps = PRIORITY_TOKEN_RE.captures(token)?;
    Priority::parse(&caps.get(1)?.as_str().to_ascii_lowercase())
}

fn parse_due_token(token: &str) -> Option<DueFilter> {
    let caps = DUE_TOKEN_RE.captures(token)?;
    match caps.get(1)?.as_str().to_ascii_lowercase().as_str() {
        "overdue" => Some(DueFilter::Overdue),
        "week" => Some(DueFilter::Week),
        _ => None,
    }
}

fn parse_est_token(token: &str) -> Option<EstFilter> {
    let caps = EST_TOKEN_RE.captures(token)?;
    let op = match caps.get(1) {
        Some(op) => EstOp::parse(op.as_str())?,
        None => EstOp::Eq,
    };
    // Digit runs too long for u64 are treated as non-matching tokens.
    let value = caps.get(2)?.as_str().parse::<u64>().ok()?;
    Some(EstFilter { op, value })
}

#[cfg(test)]
mod tests {
    use super::{parse_query, DueFilter, EstFilter, EstOp};
    use crate::model::task::Priority;

    #[test]
    fn blank_query_is_empty() {
        let parsed = parse_query("   ");
        assert!(parsed.is_empty());
        assert!(parsed.unknown_tokens.is_empty());
        assert_eq!(parsed.raw, "   ");
    }

    #[test]
    fn operators_and_free_text_are_separated() {
        let parsed = parse_query("API  tag:Urgent p:high est:>=120 due:week Review tag:urgent");
        assert_eq!(parsed.text, "api review");
        assert_eq!(parsed.tags, vec!["urgent".to_string()]);
        assert_eq!(parsed.priority, Some(Priority::High));
        assert_eq!(parsed.due, Some(DueFilter::Week));
        assert_eq!(
            parsed.est,
            Some(EstFilter {
                op: EstOp::Ge,
                value: 120
            })
        );
    }

    #[test]
    fn last_priority_wins_and_bare_est_means_equal() {
        let parsed = parse_query("p:low P:MEDIUM est:45");
        assert_eq!(parsed.priority, Some(Priority::Medium));
        assert_eq!(
            parsed.est,
            Some(EstFilter {
                op: EstOp::Eq,
                value: 45
            })
        );
    }

    #[test]
    fn unknown_colon_tokens_are_reported_not_matched() {
        let parsed = parse_query("p:urgent due:tomorrow est:~5 tag:a.b owner:me http://x");
        assert_eq!(
            parsed.unknown_tokens,
            vec!["p:urgent", "due:tomorrow", "est:~5", "tag:a.b", "owner:me", "http://x"]
        );
        assert!(parsed.is_empty());
    }

    #[test]
    fn est_filter_comparisons() {
        let lt = EstFilter {
            op: EstOp::Lt,
            value: 60,
        };
        assert!(lt.matches(59));
        assert!(!lt.matches(60));
        let ge = EstFilter {
            op: EstOp::Ge,
            value: 120,
        };
        assert!(ge.matches(120));
        assert!(!ge.matches(119));
    }
}
