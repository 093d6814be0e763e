use serde::{Deserialize, Serialize};

use super::enums::Speaker;

/// One line of an assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    /// Display label used in transcripts.
    pub fn label(&self) -> &'static str {
        match self.speaker {
            Speaker::User => "You",
            Speaker::Assistant => "AI",
        }
    }
}
