use crate::speech::recognizer::{Recognizer, RecognizerEvent};
use tracing::{debug, info, warn};

/// User-intended state of the speech session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not capturing
    Idle,
    /// Capturing; the recognizer is restarted after each utterance
    Listening,
}

/// Outcome of a `toggle` call, for the UI to translate into cues and
/// notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Started,
    Stopped,
    /// No recognizer on this system.
    Unavailable,
    /// Starting capture failed synchronously (e.g. permission denied).
    StartFailed(String),
}

/// Things that surfaced while polling recognizer events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Recognized text, ready to submit.
    Utterance(String),
    /// Recognition failed; the session is back to Idle.
    Error(String),
}

/// Two-state controller over a single-shot recognizer.
///
/// Continuous listening is emulated: when a capture session ends
/// naturally while the state is still `Listening`, the recognizer is
/// started again and restart failures are swallowed.
pub struct SpeechSession {
    recognizer: Option<Box<dyn Recognizer>>,
    state: SessionState,
}

impl SpeechSession {
    pub fn new(recognizer: Option<Box<dyn Recognizer>>) -> Self {
        Self {
            recognizer,
            state: SessionState::Idle,
        }
    }

    /// Whether a recognizer exists at all. When false the voice
    /// control is hidden.
    pub fn available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    /// Flip between Idle and Listening.
    pub fn toggle(&mut self) -> Toggle {
        let Some(recognizer) = self.recognizer.as_mut() else {
            return Toggle::Unavailable;
        };

        match self.state {
            SessionState::Idle => match recognizer.start() {
                Ok(()) => {
                    info!("Speech session started");
                    self.state = SessionState::Listening;
                    Toggle::Started
                }
                Err(e) => {
                    warn!("Failed to start speech session: {}", e);
                    self.state = SessionState::Idle;
                    Toggle::StartFailed(e.to_string())
                }
            },
            SessionState::Listening => {
                recognizer.stop();
                info!("Speech session stopped");
                self.state = SessionState::Idle;
                Toggle::Stopped
            }
        }
    }

    /// Drain recognizer events, driving the restart behavior.
    pub fn poll(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();

        let Some(recognizer) = self.recognizer.as_mut() else {
            return updates;
        };

        let events = recognizer.events();
        while let Ok(event) = events.try_recv() {
            match event {
                RecognizerEvent::Utterance(text) => {
                    debug!("Recognized utterance: '{}'", text);
                    updates.push(SessionUpdate::Utterance(text));
                }
                RecognizerEvent::Ended => {
                    if self.state == SessionState::Listening {
                        // Restart failures ("already running") are
                        // swallowed; capture continues.
                        if let Err(e) = recognizer.start() {
                            debug!("Recognizer restart: {}", e);
                        }
                    }
                }
                RecognizerEvent::Error(reason) => {
                    warn!("Recognition error: {}", reason);
                    self.state = SessionState::Idle;
                    recognizer.stop();
                    updates.push(SessionUpdate::Error(reason));
                }
            }
        }

        updates
    }
}
