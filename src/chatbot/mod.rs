//! Rule-based eye-care assistant. Stateless keyword matching over a fixed
//! vocabulary; every input resolves to a canned reply.

pub mod keywords;
pub mod responses;
pub mod rules;
pub mod session;

pub use session::ChatSession;

use crate::models::ChatContext;

/// Reply to a user message, optionally informed by the last scan result.
pub fn respond(user_text: &str, context: Option<&ChatContext>) -> &'static str {
    let (rule, reply) = rules::evaluate(user_text, context);
    tracing::debug!(rule, has_context = context.is_some(), "assistant rule matched");
    reply
}
