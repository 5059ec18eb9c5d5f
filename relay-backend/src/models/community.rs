use serde::{Deserialize, Serialize};

/// A server the bot is a member of, as seen in the gateway cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunitySummary {
    pub id: String,
    pub name: String,
}

/// Channel categories the dashboard distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
    Announcement,
    Stage,
    Forum,
    Thread,
    Other,
}

impl ChannelKind {
    /// Whether messages can be read from a channel of this kind.
    /// Voice and stage channels carry their own text chat.
    pub fn is_text_based(&self) -> bool {
        matches!(
            self,
            ChannelKind::Text
                | ChannelKind::Voice
                | ChannelKind::Announcement
                | ChannelKind::Stage
                | ChannelKind::Thread
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
}
