use super::types::{escape_markup, Message, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

/// Static greeting entry. Survives `clear` and carries no sequence id.
pub const WELCOME_TEXT: &str =
    "Hi! I'm the campus assistant. Ask me about admissions, courses, fees, or campus life.";

/// Handle to a transcript entry, used to remove typing placeholders.
pub type EntryId = u64;

#[derive(Debug, Clone)]
pub enum TranscriptEntry {
    /// The static greeting shown at the top of the transcript.
    Welcome,
    /// A rendered message. `display_text` is the markup-escaped form.
    Message {
        message: Message,
        display_text: String,
    },
    /// Typing indicator for an exchange whose reply is outstanding.
    Placeholder { id: EntryId },
}

#[derive(Debug)]
struct Inner {
    entries: Vec<TranscriptEntry>,
    next_seq: u64,
    next_entry_id: EntryId,
    revision: u64,
}

/// The conversation display list (thread-safe).
///
/// Holds the only copy of message history. Sequence ids are monotonic
/// and reset by `clear`; entry ids for placeholders are never reused.
#[derive(Debug, Clone)]
pub struct Transcript {
    inner: Arc<RwLock<Inner>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entries: vec![TranscriptEntry::Welcome],
                next_seq: 0,
                next_entry_id: 0,
                revision: 0,
            })),
        }
    }

    /// Append a message, assigning the next sequence id. Returns it.
    pub fn append(&self, sender: Sender, text: impl Into<String>) -> u64 {
        let text = text.into();
        let mut inner = self.inner.write();
        inner.next_seq += 1;
        let seq = inner.next_seq;
        let display_text = escape_markup(&text);
        inner.entries.push(TranscriptEntry::Message {
            message: Message::new(seq, sender, text),
            display_text,
        });
        inner.revision += 1;
        seq
    }

    /// Append a typing placeholder and return its handle.
    pub fn append_placeholder(&self) -> EntryId {
        let mut inner = self.inner.write();
        inner.next_entry_id += 1;
        let id = inner.next_entry_id;
        inner.entries.push(TranscriptEntry::Placeholder { id });
        inner.revision += 1;
        id
    }

    /// Remove a placeholder by handle. Removing one that is already
    /// gone (for example after `clear`) is a no-op.
    pub fn remove_placeholder(&self, id: EntryId) {
        let mut inner = self.inner.write();
        let before = inner.entries.len();
        inner
            .entries
            .retain(|e| !matches!(e, TranscriptEntry::Placeholder { id: p } if *p == id));
        if inner.entries.len() != before {
            inner.revision += 1;
        }
    }

    /// Discard everything except the welcome entry and reset the
    /// sequence counter. Placeholder handles are not reused.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.entries.push(TranscriptEntry::Welcome);
        inner.next_seq = 0;
        inner.revision += 1;
    }

    /// Snapshot of all entries in display order.
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.inner.read().entries.clone()
    }

    /// Snapshot of the messages only, skipping welcome and placeholders.
    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .read()
            .entries
            .iter()
            .filter_map(|e| match e {
                TranscriptEntry::Message { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of outstanding typing placeholders.
    pub fn pending_count(&self) -> usize {
        self.inner
            .read()
            .entries
            .iter()
            .filter(|e| matches!(e, TranscriptEntry::Placeholder { .. }))
            .count()
    }

    /// Bumped on every mutation; the renderer watches this to decide
    /// when to auto-scroll.
    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_welcome_only() {
        let transcript = Transcript::new();
        let entries = transcript.entries();
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0], TranscriptEntry::Welcome));
        assert!(transcript.messages().is_empty());
    }

    #[test]
    fn test_sequence_ids_are_monotonic() {
        let transcript = Transcript::new();
        assert_eq!(transcript.append(Sender::User, "one"), 1);
        assert_eq!(transcript.append(Sender::Bot, "two"), 2);
        assert_eq!(transcript.append(Sender::User, "three"), 3);
    }

    #[test]
    fn test_display_text_is_escaped() {
        let transcript = Transcript::new();
        transcript.append(Sender::User, "<script>alert('x')</script>");

        let entries = transcript.entries();
        match &entries[1] {
            TranscriptEntry::Message {
                message,
                display_text,
            } => {
                // Raw text is kept as typed; display text never
                // carries raw markup.
                assert_eq!(message.text, "<script>alert('x')</script>");
                assert!(display_text.contains("&lt;script&gt;"));
                assert!(!display_text.contains('<'));
            }
            other => panic!("Unexpected entry: {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_add_and_remove() {
        let transcript = Transcript::new();
        let id = transcript.append_placeholder();
        assert_eq!(transcript.pending_count(), 1);

        transcript.remove_placeholder(id);
        assert_eq!(transcript.pending_count(), 0);

        // Second removal is a no-op.
        let revision = transcript.revision();
        transcript.remove_placeholder(id);
        assert_eq!(transcript.revision(), revision);
    }

    #[test]
    fn test_two_placeholders_resolve_independently() {
        let transcript = Transcript::new();
        let first = transcript.append_placeholder();
        let second = transcript.append_placeholder();
        assert_ne!(first, second);

        transcript.remove_placeholder(second);
        assert_eq!(transcript.pending_count(), 1);
        transcript.remove_placeholder(first);
        assert_eq!(transcript.pending_count(), 0);
    }

    #[test]
    fn test_clear_resets_sequence_and_keeps_welcome() {
        let transcript = Transcript::new();
        transcript.append(Sender::User, "hello");
        transcript.append(Sender::Bot, "hi");
        transcript.append_placeholder();

        transcript.clear();

        let entries = transcript.entries();
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0], TranscriptEntry::Welcome));

        // The next message after clear starts the count over.
        assert_eq!(transcript.append(Sender::User, "again"), 1);
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let transcript = Transcript::new();
        let r0 = transcript.revision();
        transcript.append(Sender::User, "hello");
        let r1 = transcript.revision();
        assert!(r1 > r0);
        transcript.clear();
        assert!(transcript.revision() > r1);
    }
}
