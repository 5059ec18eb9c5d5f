use serde::{Deserialize, Serialize};

/// A message as returned by one upstream page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// Snowflake id; newer messages have larger ids
    pub id: u64,
    pub author: String,
    pub content: String,
    pub attachments: Vec<String>,
}

/// A message as delivered to the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedMessage {
    pub author: String,
    pub content: String,
    /// Attachment URLs in upload order
    pub attachments: Vec<String>,
}

impl From<MessageRecord> for ExportedMessage {
    fn from(record: MessageRecord) -> Self {
        Self {
            author: record.author,
            content: record.content,
            attachments: record.attachments,
        }
    }
}
