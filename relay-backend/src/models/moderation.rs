use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Kick,
    Ban,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Kick => "kick",
            ModerationAction::Ban => "ban",
        }
    }

    /// Past tense used in acknowledgments
    pub fn past_tense(&self) -> &'static str {
        match self {
            ModerationAction::Kick => "kicked",
            ModerationAction::Ban => "banned",
        }
    }
}

/// Body of a kick or ban request
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationRequest {
    pub reason: Option<String>,
}

/// Acknowledgment for mutations that return nothing upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
