use crate::Result;
use crossbeam_channel::Receiver;

/// Events delivered by a recognizer over its event channel.
#[derive(Debug, Clone)]
pub enum RecognizerEvent {
    /// A complete utterance was recognized.
    Utterance(String),

    /// Recognition failed. The reason string is shown to the user.
    Error(String),

    /// The capture session ended naturally (one utterance completed).
    Ended,
}

/// A single-shot speech recognizer.
///
/// One `start` yields at most one utterance followed by `Ended`.
/// `start` may fail synchronously (no permission, already running);
/// the session controller decides whether that is surfaced or
/// swallowed. Implementations may hold thread-bound resources (audio
/// streams); the session owns them on the UI thread.
pub trait Recognizer {
    fn start(&mut self) -> Result<()>;

    /// Stop capturing. Idempotent.
    fn stop(&mut self);

    /// The channel on which this recognizer emits events.
    fn events(&self) -> Receiver<RecognizerEvent>;
}
