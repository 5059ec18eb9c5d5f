//! Relay between the dashboard API and the gateway session.
//!
//! Every operation resolves the referenced server (and channel) from the
//! gateway cache first, so a missing id never reaches the upstream API. The
//! relay itself holds no state beyond the shared session handle.

mod error;
pub mod export;

pub use error::RelayError;

use crate::gateway::GatewaySession;
use crate::models::{
    ActionResponse, AuditLogEntry, ChannelSummary, CommunitySummary, CreateRoleRequest,
    ExportedMessage, ModerationAction, NewRole, RoleSummary, DEFAULT_REASON,
};
use std::sync::Arc;

/// Number of audit log entries returned per request
pub const AUDIT_LOG_LIMIT: u8 = 20;

#[derive(Clone)]
pub struct RelayService {
    session: Arc<dyn GatewaySession>,
}

impl RelayService {
    pub fn new(session: Arc<dyn GatewaySession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<dyn GatewaySession> {
        &self.session
    }

    fn require_community(&self, community_id: &str) -> Result<CommunitySummary, RelayError> {
        self.session
            .community(community_id)
            .ok_or(RelayError::ServerNotFound)
    }

    pub fn list_communities(&self) -> Vec<CommunitySummary> {
        self.session.communities()
    }

    pub fn list_channels(&self, community_id: &str) -> Result<Vec<ChannelSummary>, RelayError> {
        self.session
            .channels(community_id)
            .ok_or(RelayError::ServerNotFound)
    }

    /// Export the complete history of a text channel, newest first
    pub async fn export_messages(
        &self,
        community_id: &str,
        channel_id: &str,
    ) -> Result<Vec<ExportedMessage>, RelayError> {
        self.require_community(community_id)?;
        let channel = self
            .session
            .channel(community_id, channel_id)
            .filter(|c| c.kind.is_text_based())
            .ok_or(RelayError::ChannelNotFound)?;

        let history = export::fetch_full_history(self.session.as_ref(), &channel.id)
            .await
            .map_err(RelayError::failed("Failed to fetch messages"))?;

        Ok(history.into_iter().map(ExportedMessage::from).collect())
    }

    pub async fn audit_log(&self, community_id: &str) -> Result<Vec<AuditLogEntry>, RelayError> {
        self.require_community(community_id)?;
        let records = self
            .session
            .fetch_audit_log(community_id, AUDIT_LOG_LIMIT)
            .await
            .map_err(RelayError::failed("Failed to fetch audit logs"))?;

        Ok(records.into_iter().map(AuditLogEntry::from).collect())
    }

    /// Kick or ban a member. A missing or empty reason is replaced by the
    /// placeholder so the audit log always carries one.
    pub async fn moderate(
        &self,
        community_id: &str,
        member_id: &str,
        action: ModerationAction,
        reason: Option<String>,
    ) -> Result<ActionResponse, RelayError> {
        self.require_community(community_id)?;
        let reason = reason
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REASON.to_string());

        match action {
            ModerationAction::Kick => self
                .session
                .kick_member(community_id, member_id, &reason)
                .await
                .map_err(RelayError::failed("Failed to kick member"))?,
            ModerationAction::Ban => self
                .session
                .ban_member(community_id, member_id, &reason)
                .await
                .map_err(RelayError::failed("Failed to ban member"))?,
        }

        log::info!(
            "Member {} {} from server {}: {}",
            member_id,
            action.past_tense(),
            community_id,
            reason
        );
        Ok(ActionResponse::ok(format!(
            "Member {} successfully",
            action.past_tense()
        )))
    }

    pub async fn create_role(
        &self,
        community_id: &str,
        request: CreateRoleRequest,
    ) -> Result<RoleSummary, RelayError> {
        self.require_community(community_id)?;
        let role = NewRole::from(request);
        self.session
            .create_role(community_id, &role)
            .await
            .map_err(RelayError::failed("Failed to create role"))
    }

    pub async fn delete_role(
        &self,
        community_id: &str,
        role_id: &str,
    ) -> Result<ActionResponse, RelayError> {
        self.require_community(community_id)?;
        self.session
            .delete_role(community_id, role_id)
            .await
            .map_err(RelayError::failed("Failed to delete role"))?;

        Ok(ActionResponse::ok("Role deleted successfully"))
    }
}
