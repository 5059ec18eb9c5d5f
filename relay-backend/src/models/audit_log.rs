use serde::{Deserialize, Serialize};

/// Placeholder used wherever a moderation reason is missing
pub const DEFAULT_REASON: &str = "No reason provided";

/// An audit log entry as returned upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogRecord {
    pub action: String,
    pub user: String,
    pub target: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Action name, e.g. "MemberKick"
    pub action: String,
    /// Tag of the user who performed the action
    pub user: String,
    /// Tag of the target user when known, otherwise its raw id
    pub target: Option<String>,
    pub reason: String,
}

impl From<AuditLogRecord> for AuditLogEntry {
    fn from(record: AuditLogRecord) -> Self {
        Self {
            action: record.action,
            user: record.user,
            target: record.target,
            reason: record
                .reason
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_REASON.to_string()),
        }
    }
}
