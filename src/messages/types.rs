use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

/// One transcript message. The text is kept raw; escaping happens
/// when the transcript builds the entry's display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic sequence id, assigned by the transcript.
    pub seq: u64,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(seq: u64, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            seq,
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Timestamp formatted the way the transcript shows it.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Escape the characters that carry meaning in markup. Display text
/// never contains raw `&`, `<`, `>`, `"`, or `'`.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
