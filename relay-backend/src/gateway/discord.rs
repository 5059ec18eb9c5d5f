use super::{GatewayError, GatewaySession, GuildCache};
use crate::models::{
    AuditLogRecord, ChannelKind, ChannelSummary, CommunitySummary, MessageRecord, NewRole,
    RoleSummary,
};
use async_trait::async_trait;
use serenity::all::{
    Cache, ChannelId, ChannelType, Client, Context, EditRole, EventHandler, GatewayIntents,
    GetMessages, GuildChannel, GuildId, Http, Message, MessageId, Permissions, Ready, Role,
    RoleId, UserId,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct ReadyHandler {
    connected: Arc<AtomicBool>,
}

#[serenity::async_trait]
impl EventHandler for ReadyHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!(
            "Discord: Logged in as {} ({} guilds)",
            ready.user.tag(),
            ready.guilds.len()
        );
        self.connected.store(true, Ordering::SeqCst);
    }
}

/// Gateway session backed by a serenity client's cache and HTTP handle
pub struct SerenitySession {
    cache: Arc<Cache>,
    http: Arc<Http>,
    connected: Arc<AtomicBool>,
}

/// Connect to Discord and keep the shards running on a background task.
///
/// The task exits when `shutdown_rx` fires or the client stops on its own.
pub async fn start_gateway(
    bot_token: &str,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> Result<(Arc<SerenitySession>, JoinHandle<()>), GatewayError> {
    log::debug!("Discord: Token length = {}", bot_token.len());

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::MESSAGE_CONTENT;

    let connected = Arc::new(AtomicBool::new(false));
    let handler = ReadyHandler {
        connected: connected.clone(),
    };

    let mut client = Client::builder(bot_token, intents)
        .event_handler(handler)
        .await?;

    log::info!("Discord: Client created successfully");

    let session = Arc::new(SerenitySession {
        cache: client.cache.clone(),
        http: client.http.clone(),
        connected: connected.clone(),
    });

    let shard_manager = client.shard_manager.clone();
    let task = tokio::spawn(async move {
        tokio::select! {
            _ = &mut shutdown_rx => {
                log::info!("Discord: Received shutdown signal");
                shard_manager.shutdown_all().await;
            }
            result = client.start() => {
                match result {
                    Ok(()) => log::info!("Discord: Client stopped"),
                    Err(e) => log::error!("Discord client error: {}", e),
                }
            }
        }
        connected.store(false, Ordering::SeqCst);
    });

    Ok((session, task))
}

/// Parse a snowflake from a path segment. Zero is not a valid snowflake.
fn parse_snowflake(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id != 0)
}

fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text => ChannelKind::Text,
        ChannelType::Voice => ChannelKind::Voice,
        ChannelType::Category => ChannelKind::Category,
        ChannelType::News => ChannelKind::Announcement,
        ChannelType::Stage => ChannelKind::Stage,
        ChannelType::Forum => ChannelKind::Forum,
        ChannelType::NewsThread | ChannelType::PublicThread | ChannelType::PrivateThread => {
            ChannelKind::Thread
        }
        _ => ChannelKind::Other,
    }
}

fn channel_summary(channel: &GuildChannel) -> ChannelSummary {
    ChannelSummary {
        id: channel.id.to_string(),
        name: channel.name.clone(),
        kind: channel_kind(channel.kind),
    }
}

/// Channel summaries ordered by position, with threads after regular channels
fn channel_summaries<'a>(
    channels: impl Iterator<Item = &'a GuildChannel>,
) -> Vec<ChannelSummary> {
    let mut channels: Vec<&GuildChannel> = channels.collect();
    channels.sort_by_key(|c| {
        (
            channel_kind(c.kind) == ChannelKind::Thread,
            c.position,
            c.id,
        )
    });
    channels.into_iter().map(channel_summary).collect()
}

fn find_channel<'a>(
    mut channels: impl Iterator<Item = &'a GuildChannel>,
    channel_id: ChannelId,
) -> Option<ChannelSummary> {
    channels.find(|c| c.id == channel_id).map(channel_summary)
}

fn message_record(msg: Message) -> MessageRecord {
    MessageRecord {
        id: msg.id.get(),
        author: msg.author.name,
        content: msg.content,
        attachments: msg.attachments.into_iter().map(|a| a.url).collect(),
    }
}

fn role_summary(role: &Role) -> RoleSummary {
    RoleSummary {
        id: role.id.to_string(),
        name: role.name.clone(),
        color: format!("#{}", role.colour.hex()),
        permissions: role
            .permissions
            .iter_names()
            .map(|(name, _)| name.to_string())
            .collect(),
    }
}

/// Collapse a `Debug` rendering such as `Member(Kick)` into `MemberKick`
fn action_name(debug: &str) -> String {
    debug.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Parse `#RRGGBB`, `RRGGBB`, `0xRRGGBB` or a decimal color value
fn parse_color(raw: &str) -> Result<u32, GatewayError> {
    let trimmed = raw.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else if trimmed.len() == 6 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        u32::from_str_radix(trimmed, 16).ok()
    } else {
        trimmed.parse::<u32>().ok()
    };

    parsed
        .filter(|value| *value <= 0xFF_FF_FF)
        .ok_or_else(|| GatewayError::InvalidColor(raw.to_string()))
}

/// Normalize `KickMembers` or `kick_members` to the flag name `KICK_MEMBERS`
fn permission_flag_name(name: &str) -> String {
    let name = name.trim();
    if name.contains('_') || !name.chars().any(|c| c.is_ascii_lowercase()) {
        return name.to_ascii_uppercase();
    }

    let mut flag = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            flag.push('_');
        }
        flag.push(c.to_ascii_uppercase());
    }
    flag
}

/// Resolve permission names (or raw bit values) into a permission set
fn parse_permissions(names: &[String]) -> Result<Permissions, GatewayError> {
    let mut permissions = Permissions::empty();
    for name in names {
        let flag = Permissions::from_name(&permission_flag_name(name))
            .or_else(|| name.trim().parse::<u64>().ok().map(Permissions::from_bits_truncate))
            .ok_or_else(|| GatewayError::UnknownPermission(name.clone()))?;
        permissions |= flag;
    }
    Ok(permissions)
}

impl SerenitySession {
    fn guild_id(&self, community_id: &str) -> Result<GuildId, GatewayError> {
        parse_snowflake(community_id)
            .map(GuildId::new)
            .ok_or_else(|| GatewayError::InvalidId(community_id.to_string()))
    }

    /// Confirm the member exists before acting on them
    async fn resolve_member(
        &self,
        guild_id: GuildId,
        member_id: &str,
    ) -> Result<UserId, GatewayError> {
        let user_id = parse_snowflake(member_id)
            .map(UserId::new)
            .ok_or(GatewayError::MemberNotFound)?;

        guild_id
            .member(&self.http, user_id)
            .await
            .map_err(|e| {
                log::debug!("Discord: Member {} lookup failed: {}", member_id, e);
                GatewayError::MemberNotFound
            })?;

        Ok(user_id)
    }
}

impl GuildCache for SerenitySession {
    fn communities(&self) -> Vec<CommunitySummary> {
        let mut communities: Vec<CommunitySummary> = self
            .cache
            .guilds()
            .into_iter()
            .filter_map(|id| {
                self.cache.guild(id).map(|guild| CommunitySummary {
                    id: guild.id.to_string(),
                    name: guild.name.clone(),
                })
            })
            .collect();
        communities.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        communities
    }

    fn community(&self, community_id: &str) -> Option<CommunitySummary> {
        let guild_id = parse_snowflake(community_id).map(GuildId::new)?;
        self.cache.guild(guild_id).map(|guild| CommunitySummary {
            id: guild.id.to_string(),
            name: guild.name.clone(),
        })
    }

    fn channels(&self, community_id: &str) -> Option<Vec<ChannelSummary>> {
        let guild_id = parse_snowflake(community_id).map(GuildId::new)?;
        let guild = self.cache.guild(guild_id)?;

        // Active threads are cached apart from the guild's channels
        Some(channel_summaries(
            guild.channels.values().chain(guild.threads.iter()),
        ))
    }

    fn channel(&self, community_id: &str, channel_id: &str) -> Option<ChannelSummary> {
        let guild_id = parse_snowflake(community_id).map(GuildId::new)?;
        let channel_id = parse_snowflake(channel_id).map(ChannelId::new)?;
        let guild = self.cache.guild(guild_id)?;
        guild
            .channels
            .get(&channel_id)
            .map(channel_summary)
            .or_else(|| find_channel(guild.threads.iter(), channel_id))
    }
}

#[async_trait]
impl GatewaySession for SerenitySession {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn fetch_message_page(
        &self,
        channel_id: &str,
        before: Option<u64>,
        limit: u8,
    ) -> Result<Vec<MessageRecord>, GatewayError> {
        let channel = parse_snowflake(channel_id)
            .map(ChannelId::new)
            .ok_or_else(|| GatewayError::InvalidId(channel_id.to_string()))?;

        let mut request = GetMessages::new().limit(limit);
        if let Some(before) = before.filter(|id| *id != 0) {
            request = request.before(MessageId::new(before));
        }

        let messages = channel.messages(&self.http, request).await?;
        Ok(messages.into_iter().map(message_record).collect())
    }

    async fn fetch_audit_log(
        &self,
        community_id: &str,
        limit: u8,
    ) -> Result<Vec<AuditLogRecord>, GatewayError> {
        let guild_id = self.guild_id(community_id)?;
        let logs = guild_id
            .audit_logs(&self.http, None, None, None, Some(limit))
            .await?;

        let tag_for = |id: u64| {
            logs.users
                .values()
                .find(|user| user.id.get() == id)
                .map(|user| user.tag())
                .unwrap_or_else(|| id.to_string())
        };

        let records = logs
            .entries
            .iter()
            .map(|entry| AuditLogRecord {
                action: action_name(&format!("{:?}", entry.action)),
                user: tag_for(entry.user_id.get()),
                target: entry.target_id.map(|target| tag_for(target.get())),
                reason: entry.reason.clone(),
            })
            .collect();

        Ok(records)
    }

    async fn kick_member(
        &self,
        community_id: &str,
        member_id: &str,
        reason: &str,
    ) -> Result<(), GatewayError> {
        let guild_id = self.guild_id(community_id)?;
        let user_id = self.resolve_member(guild_id, member_id).await?;
        guild_id.kick_with_reason(&self.http, user_id, reason).await?;
        log::debug!("Discord: Kicked {} from {}", user_id, guild_id);
        Ok(())
    }

    async fn ban_member(
        &self,
        community_id: &str,
        member_id: &str,
        reason: &str,
    ) -> Result<(), GatewayError> {
        let guild_id = self.guild_id(community_id)?;
        let user_id = self.resolve_member(guild_id, member_id).await?;
        guild_id
            .ban_with_reason(&self.http, user_id, 0, reason)
            .await?;
        log::debug!("Discord: Banned {} from {}", user_id, guild_id);
        Ok(())
    }

    async fn create_role(
        &self,
        community_id: &str,
        role: &NewRole,
    ) -> Result<RoleSummary, GatewayError> {
        let guild_id = self.guild_id(community_id)?;
        let colour = parse_color(&role.color)?;
        let permissions = parse_permissions(&role.permissions)?;

        let builder = EditRole::new()
            .name(role.name.clone())
            .colour(colour)
            .permissions(permissions);
        let created = guild_id.create_role(&self.http, builder).await?;

        log::info!("Discord: Created role {} in {}", created.id, guild_id);
        Ok(role_summary(&created))
    }

    async fn delete_role(&self, community_id: &str, role_id: &str) -> Result<(), GatewayError> {
        let guild_id = self.guild_id(community_id)?;
        let role_id = parse_snowflake(role_id)
            .map(RoleId::new)
            .ok_or(GatewayError::RoleNotFound)?;

        let known = self
            .cache
            .guild(guild_id)
            .is_some_and(|guild| guild.roles.contains_key(&role_id));
        if !known {
            return Err(GatewayError::RoleNotFound);
        }

        guild_id.delete_role(&self.http, role_id).await?;
        log::info!("Discord: Deleted role {} in {}", role_id, guild_id);
        Ok(())
    }
}
