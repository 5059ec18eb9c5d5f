pub mod discord;
#[cfg(test)]
pub mod fake;

use crate::models::{
    AuditLogRecord, ChannelSummary, CommunitySummary, MessageRecord, NewRole, RoleSummary,
};
use async_trait::async_trait;
use thiserror::Error;

/// Failures produced while talking to the chat platform
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Member not found")]
    MemberNotFound,

    #[error("Role not found")]
    RoleNotFound,

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    #[error("Message history did not advance past message {cursor}")]
    CursorStalled { cursor: u64 },

    #[error(transparent)]
    Discord(#[from] serenity::Error),
}

/// Read-only view of the servers and channels held in the gateway cache.
///
/// Lookups never hit the network; an id that is not cached is reported as
/// absent.
pub trait GuildCache: Send + Sync {
    fn communities(&self) -> Vec<CommunitySummary>;

    fn community(&self, community_id: &str) -> Option<CommunitySummary>;

    /// Channels of a community, or None if the community is not cached
    fn channels(&self, community_id: &str) -> Option<Vec<ChannelSummary>>;

    fn channel(&self, community_id: &str, channel_id: &str) -> Option<ChannelSummary>;
}

/// A live session with the chat platform, shared by every request
#[async_trait]
pub trait GatewaySession: GuildCache {
    /// Whether the session has completed its handshake
    fn is_connected(&self) -> bool;

    /// Fetch up to `limit` messages strictly older than `before`, newest
    /// first. With no cursor the newest messages are returned.
    async fn fetch_message_page(
        &self,
        channel_id: &str,
        before: Option<u64>,
        limit: u8,
    ) -> Result<Vec<MessageRecord>, GatewayError>;

    /// Most recent audit log entries, newest first
    async fn fetch_audit_log(
        &self,
        community_id: &str,
        limit: u8,
    ) -> Result<Vec<AuditLogRecord>, GatewayError>;

    async fn kick_member(
        &self,
        community_id: &str,
        member_id: &str,
        reason: &str,
    ) -> Result<(), GatewayError>;

    async fn ban_member(
        &self,
        community_id: &str,
        member_id: &str,
        reason: &str,
    ) -> Result<(), GatewayError>;

    async fn create_role(
        &self,
        community_id: &str,
        role: &NewRole,
    ) -> Result<RoleSummary, GatewayError>;

    async fn delete_role(&self, community_id: &str, role_id: &str) -> Result<(), GatewayError>;
}
