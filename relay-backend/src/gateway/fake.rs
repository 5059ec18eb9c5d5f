//! In-memory gateway session used by tests.
//!
//! Every upstream operation is recorded in call order so tests can assert on
//! how many calls a relay operation made, and kick/ban/role mutations append
//! to an audit log that `fetch_audit_log` reads back.

use super::{GatewayError, GatewaySession, GuildCache};
use crate::models::{
    AuditLogRecord, ChannelKind, ChannelSummary, CommunitySummary, MessageRecord, NewRole,
    RoleSummary,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

const ACTOR_TAG: &str = "relay-bot#0001";

struct FakeCommunity {
    summary: CommunitySummary,
    channels: Vec<ChannelSummary>,
}

#[derive(Default)]
pub struct FakeSession {
    communities: Vec<FakeCommunity>,
    /// Channel id -> messages, newest first
    messages: HashMap<String, Vec<MessageRecord>>,
    /// (community id, member id)
    members: Mutex<HashSet<(String, String)>>,
    /// Community id -> roles
    roles: Mutex<HashMap<String, Vec<RoleSummary>>>,
    audit_log: Mutex<Vec<AuditLogRecord>>,
    calls: Mutex<Vec<String>>,
    /// 1-based page fetch that fails
    failing_page: Option<usize>,
    /// Pages ignore the `before` cursor
    ignore_cursor: bool,
    next_role_id: Mutex<u64>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_community(mut self, id: &str, name: &str) -> Self {
        self.communities.push(FakeCommunity {
            summary: CommunitySummary {
                id: id.to_string(),
                name: name.to_string(),
            },
            channels: Vec::new(),
        });
        self
    }

    pub fn with_channel(mut self, community_id: &str, id: &str, name: &str, kind: ChannelKind) -> Self {
        let community = self
            .communities
            .iter_mut()
            .find(|c| c.summary.id == community_id)
            .expect("community must be added before its channels");
        community.channels.push(ChannelSummary {
            id: id.to_string(),
            name: name.to_string(),
            kind,
        });
        self
    }

    /// Seed a channel with `count` messages. Ids run from `1000 + count`
    /// (newest) down to `1001` (oldest).
    pub fn with_messages(mut self, channel_id: &str, count: u64) -> Self {
        let messages = (1..=count)
            .rev()
            .map(|n| MessageRecord {
                id: 1000 + n,
                author: format!("user{}", n % 3),
                content: format!("message {}", n),
                attachments: if n % 10 == 0 {
                    vec![format!("https://cdn.example.com/{}.png", n)]
                } else {
                    Vec::new()
                },
            })
            .collect();
        self.messages.insert(channel_id.to_string(), messages);
        self
    }

    pub fn with_member(self, community_id: &str, member_id: &str) -> Self {
        self.members
            .lock()
            .unwrap()
            .insert((community_id.to_string(), member_id.to_string()));
        self
    }

    pub fn with_role(self, community_id: &str, role_id: &str, name: &str) -> Self {
        self.roles
            .lock()
            .unwrap()
            .entry(community_id.to_string())
            .or_default()
            .push(RoleSummary {
                id: role_id.to_string(),
                name: name.to_string(),
                color: "#FFFFFF".to_string(),
                permissions: Vec::new(),
            });
        self
    }

    pub fn failing_on_page(mut self, page: usize) -> Self {
        self.failing_page = Some(page);
        self
    }

    pub fn ignoring_cursor(mut self) -> Self {
        self.ignore_cursor = true;
        self
    }

    /// Names of upstream operations called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn page_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.as_str() == "fetch_message_page")
            .count()
    }

    pub fn roles(&self, community_id: &str) -> Vec<RoleSummary> {
        self.roles
            .lock()
            .unwrap()
            .get(community_id)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: &str) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call.to_string());
        calls.iter().filter(|c| c.as_str() == call).count()
    }

    fn append_audit(&self, action: &str, target: &str, reason: &str) {
        self.audit_log.lock().unwrap().push(AuditLogRecord {
            action: action.to_string(),
            user: ACTOR_TAG.to_string(),
            target: Some(target.to_string()),
            reason: Some(reason.to_string()).filter(|r| !r.is_empty()),
        });
    }

    fn remove_member(&self, community_id: &str, member_id: &str) -> Result<(), GatewayError> {
        let removed = self
            .members
            .lock()
            .unwrap()
            .remove(&(community_id.to_string(), member_id.to_string()));
        if removed {
            Ok(())
        } else {
            Err(GatewayError::MemberNotFound)
        }
    }
}

impl GuildCache for FakeSession {
    fn communities(&self) -> Vec<CommunitySummary> {
        self.communities.iter().map(|c| c.summary.clone()).collect()
    }

    fn community(&self, community_id: &str) -> Option<CommunitySummary> {
        self.communities
            .iter()
            .find(|c| c.summary.id == community_id)
            .map(|c| c.summary.clone())
    }

    fn channels(&self, community_id: &str) -> Option<Vec<ChannelSummary>> {
        self.communities
            .iter()
            .find(|c| c.summary.id == community_id)
            .map(|c| c.channels.clone())
    }

    fn channel(&self, community_id: &str, channel_id: &str) -> Option<ChannelSummary> {
        self.channels(community_id)?
            .into_iter()
            .find(|c| c.id == channel_id)
    }
}

#[async_trait]
impl GatewaySession for FakeSession {
    fn is_connected(&self) -> bool {
        true
    }

    async fn fetch_message_page(
        &self,
        channel_id: &str,
        before: Option<u64>,
        limit: u8,
    ) -> Result<Vec<MessageRecord>, GatewayError> {
        let page_number = self.record("fetch_message_page");
        if self.failing_page == Some(page_number) {
            return Err(GatewayError::Discord(serenity::Error::Other(
                "upstream unavailable",
            )));
        }

        let cursor = if self.ignore_cursor { None } else { before };
        let page: Vec<MessageRecord> = self
            .messages
            .get(channel_id)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| cursor.is_none_or(|before| m.id < before))
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(page)
    }

    async fn fetch_audit_log(
        &self,
        _community_id: &str,
        limit: u8,
    ) -> Result<Vec<AuditLogRecord>, GatewayError> {
        self.record("fetch_audit_log");
        let log = self.audit_log.lock().unwrap();
        Ok(log.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn kick_member(
        &self,
        community_id: &str,
        member_id: &str,
        reason: &str,
    ) -> Result<(), GatewayError> {
        self.record("kick_member");
        self.remove_member(community_id, member_id)?;
        self.append_audit("MemberKick", member_id, reason);
        Ok(())
    }

    async fn ban_member(
        &self,
        community_id: &str,
        member_id: &str,
        reason: &str,
    ) -> Result<(), GatewayError> {
        self.record("ban_member");
        self.remove_member(community_id, member_id)?;
        self.append_audit("MemberBanAdd", member_id, reason);
        Ok(())
    }

    async fn create_role(
        &self,
        community_id: &str,
        role: &NewRole,
    ) -> Result<RoleSummary, GatewayError> {
        self.record("create_role");
        let id = {
            let mut next = self.next_role_id.lock().unwrap();
            *next += 1;
            format!("R{}", next)
        };
        let created = RoleSummary {
            id: id.clone(),
            name: role.name.clone(),
            color: role.color.clone(),
            permissions: role.permissions.clone(),
        };
        self.roles
            .lock()
            .unwrap()
            .entry(community_id.to_string())
            .or_default()
            .push(created.clone());
        self.append_audit("RoleCreate", &id, "");
        Ok(created)
    }

    async fn delete_role(&self, community_id: &str, role_id: &str) -> Result<(), GatewayError> {
        self.record("delete_role");
        let mut roles = self.roles.lock().unwrap();
        let community_roles = roles.entry(community_id.to_string()).or_default();
        let before = community_roles.len();
        community_roles.retain(|r| r.id != role_id);
        if community_roles.len() == before {
            return Err(GatewayError::RoleNotFound);
        }
        drop(roles);
        self.append_audit("RoleDelete", role_id, "");
        Ok(())
    }
}
