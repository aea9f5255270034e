pub mod transcript;
pub mod types;

pub use transcript::{EntryId, Transcript, TranscriptEntry, WELCOME_TEXT};
pub use types::{escape_markup, Message, Sender};
