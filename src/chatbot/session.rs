use crate::models::{ChatContext, ChatTurn};

use super::responses;

/// In-memory conversation with the eye-care assistant. Turns are append-only
/// and dropped with the session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    context: Option<ChatContext>,
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    /// Start a session, greeting the user with their last result if any.
    pub fn open(context: Option<ChatContext>) -> Self {
        let greeting = match &context {
            Some(ctx) => responses::welcome_after_scan(&ctx.class_name),
            None => responses::WELCOME.to_string(),
        };
        Self {
            context,
            turns: vec![ChatTurn::assistant(greeting)],
        }
    }

    pub fn context(&self) -> Option<&ChatContext> {
        self.context.as_ref()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Record a user message and the assistant's reply. Blank input is
    /// ignored and returns `None`.
    pub fn send(&mut self, user_text: &str) -> Option<&ChatTurn> {
        if user_text.trim().is_empty() {
            return None;
        }
        let reply = super::respond(user_text, self.context.as_ref());
        self.turns.push(ChatTurn::user(user_text));
        self.turns.push(ChatTurn::assistant(reply));
        self.turns.last()
    }

    /// Transcript as shown in the chat window.
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}\n\n", turn.label(), turn.text))
            .collect()
    }
}
