use serde::{Deserialize, Serialize};

/// Bot reply used when the backend answers without a usable
/// `response` field.
pub const FALLBACK_EMPTY_REPLY: &str = "I'm sorry, I didn't catch that. Could you rephrase?";

/// Bot reply used when the request fails outright.
pub const FALLBACK_UNREACHABLE: &str =
    "I'm having trouble reaching the server. Please try again later.";

/// Request body for the backend endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply body from the backend. The `response` field may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatReply {
    /// The bot text to render: the reply if present and non-empty,
    /// the fixed fallback otherwise.
    pub fn into_bot_text(self) -> String {
        match self.response {
            Some(text) if !text.trim().is_empty() => text,
            _ => FALLBACK_EMPTY_REPLY.to_string(),
        }
    }
}
