mod audit_log;
mod community;
mod message;
mod moderation;
mod role;

pub use audit_log::{AuditLogEntry, AuditLogRecord, DEFAULT_REASON};
pub use community::{ChannelKind, ChannelSummary, CommunitySummary};
pub use message::{ExportedMessage, MessageRecord};
pub use moderation::{ActionResponse, ModerationAction, ModerationRequest};
pub use role::{CreateRoleRequest, NewRole, RoleSummary};
