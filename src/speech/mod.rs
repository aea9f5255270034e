//! Speech input: the recognizer seam and the session controller.
//!
//! The recognizer is single-shot; continuous listening is emulated by
//! the session controller restarting it whenever a capture session
//! ends naturally while the user still wants to listen.

pub mod recognizer;
pub mod session;

#[cfg(feature = "audio-io")]
pub mod mic;
#[cfg(feature = "audio-io")]
pub mod stt;

pub use recognizer::{Recognizer, RecognizerEvent};
pub use session::{SessionState, SessionUpdate, SpeechSession, Toggle};

#[cfg(feature = "audio-io")]
pub use stt::WhisperConfig;

/// Probe for a usable recognizer: input device present and the
/// speech model loadable. `None` means the voice control is hidden.
#[cfg(feature = "audio-io")]
pub fn default_recognizer(config: stt::WhisperConfig) -> Option<Box<dyn Recognizer>> {
    match mic::MicRecognizer::new(config) {
        Ok(recognizer) => Some(Box::new(recognizer)),
        Err(e) => {
            tracing::warn!("Speech input unavailable: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "audio-io"))]
pub fn default_recognizer() -> Option<Box<dyn Recognizer>> {
    None
}
