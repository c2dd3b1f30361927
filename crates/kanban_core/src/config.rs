//! Board engine configuration.
//!
//! # Invariants
//! - `audit_log_cap` is always within `1..=AUDIT_LOG_CAP_MAX`.

/// Retained audit events when nothing else is configured.
pub const DEFAULT_AUDIT_LOG_CAP: usize = 500;
/// Hard upper bound for the retained audit log.
pub const AUDIT_LOG_CAP_MAX: usize = 10_000;
/// Actor tag written on every audit event (single-user model).
pub const DEFAULT_USER_LABEL: &str = "User";
/// Environment variable naming the board database file.
pub const ENV_DB_PATH: &str = "KANBAN_DB_PATH";
/// Number of import errors shown before collapsing the rest.
pub const DEFAULT_ERROR_DISPLAY_LIMIT: usize = 10;

/// Tunables of the board engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    audit_log_cap: usize,
    user_label: String,
}

impl BoardConfig {
    /// Returns a copy with a normalized audit log cap.
    ///
    /// `0` falls back to [`DEFAULT_AUDIT_LOG_CAP`]; larger values are clamped
    /// to [`AUDIT_LOG_CAP_MAX`].
    pub fn with_audit_log_cap(mut self, cap: usize) -> Self {
        self.audit_log_cap = normalize_audit_log_cap(cap);
        self
    }

    /// Returns a copy with a different actor label; blank labels are ignored.
    pub fn with_user_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.trim().is_empty() {
            self.user_label = label.trim().to_string();
        }
        self
    }

    pub fn audit_log_cap(&self) -> usize {
        self.audit_log_cap
    }

    pub fn user_label(&self) -> &str {
        self.user_label.as_str()
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            audit_log_cap: DEFAULT_AUDIT_LOG_CAP,
            user_label: DEFAULT_USER_LABEL.to_string(),
        }
    }
}

fn normalize_audit_log_cap(cap: usize) -> usize {
    match cap {
        0 => DEFAULT_AUDIT_LOG_CAP,
        value if value > AUDIT_LOG_CAP_MAX => AUDIT_LOG_CAP_MAX,
        value => value,
    }
}
