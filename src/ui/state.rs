//! Application state and the event dispatcher.
//!
//! `AppState` is the message exchange coordinator: `submit` renders
//! the user message and hands the request to the exchange worker;
//! `poll_events` drains typed events from the workers each frame and
//! drives transcript, notification, and speech-session updates.

use crate::exchange::{ExchangeCommand, ExchangeEvent, FALLBACK_UNREACHABLE};
use crate::messages::{EntryId, Sender as MessageSender, Transcript};
use crate::notify::{Kind, NotificationCenter};
use crate::settings::{Settings, SettingsStore};
use crate::sound::{self, Cue};
use crate::speech::{SessionUpdate, SpeechSession, Toggle};
use crate::ChatterError;
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// Canned queries shown above the input bar.
pub const QUICK_ACTIONS: &[&str] = &[
    "Admission requirements",
    "Course catalog",
    "Tuition & fees",
    "Library hours",
];

/// Central application state
pub struct AppState {
    /// Conversation display list
    pub transcript: Transcript,

    /// Current text input
    pub input_text: String,

    /// Toast notifications
    pub notifications: NotificationCenter,

    /// Live settings record
    pub settings: Settings,

    /// Speech session controller
    pub speech: SpeechSession,

    /// Whether the settings window is open
    pub show_settings: bool,

    /// Whether the clear-chat confirmation is open
    pub confirm_clear: bool,

    /// Set to focus the input field on the next frame
    pub focus_input: bool,

    settings_store: SettingsStore,

    /// Channel to send exchange commands
    exchange_tx: Option<Sender<ExchangeCommand>>,

    /// Channel to receive exchange events
    exchange_rx: Option<Receiver<ExchangeEvent>>,

    /// In-flight exchanges: request id -> typing placeholder
    pending: HashMap<Uuid, EntryId>,

    /// Whether the exchange worker's death was already reported
    exchange_down: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_parts(SettingsStore::new(), SpeechSession::new(None))
    }

    /// Build with explicit collaborators. Settings are loaded from
    /// the store immediately.
    pub fn with_parts(settings_store: SettingsStore, speech: SpeechSession) -> Self {
        let settings = settings_store.load();
        Self {
            transcript: Transcript::new(),
            input_text: String::new(),
            notifications: NotificationCenter::new(),
            settings,
            speech,
            show_settings: false,
            confirm_clear: false,
            focus_input: false,
            settings_store,
            exchange_tx: None,
            exchange_rx: None,
            pending: HashMap::new(),
            exchange_down: false,
        }
    }

    /// Wire up the exchange worker channels.
    pub fn connect_exchange(
        &mut self,
        command_tx: Sender<ExchangeCommand>,
        event_rx: Receiver<ExchangeEvent>,
    ) {
        self.exchange_tx = Some(command_tx);
        self.exchange_rx = Some(event_rx);
    }

    /// Submit a message: echo it, show a typing placeholder, and post
    /// it to the backend. Empty input is a no-op.
    pub fn submit(&mut self, raw: &str) {
        let text = raw.trim();
        if text.is_empty() {
            return;
        }

        self.transcript.append(MessageSender::User, text);
        self.input_text.clear();

        let request_id = Uuid::new_v4();
        let placeholder = self.transcript.append_placeholder();
        self.pending.insert(request_id, placeholder);

        let command = ExchangeCommand::Send {
            text: text.to_string(),
            request_id,
        };

        let sent = match &self.exchange_tx {
            Some(tx) => tx.send(command).is_ok(),
            None => false,
        };

        if !sent {
            // No worker to answer; resolve the exchange as failed so
            // the one-reply-per-submit guarantee still holds.
            self.resolve_failure(request_id, "exchange worker unavailable");
        }
    }

    /// Drain worker events. Called once per frame.
    pub fn poll_events(&mut self) {
        let mut events = Vec::new();
        let mut disconnected = false;

        if let Some(rx) = &self.exchange_rx {
            loop {
                match rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        for event in events {
            match event {
                ExchangeEvent::Reply { text, request_id } => {
                    self.resolve_reply(request_id, text);
                }
                ExchangeEvent::Failed { error, request_id } => {
                    self.resolve_failure(request_id, &error);
                }
                ExchangeEvent::Shutdown => disconnected = true,
            }
        }

        if disconnected {
            self.handle_exchange_down();
        }

        for update in self.speech.poll() {
            match update {
                SessionUpdate::Utterance(text) => {
                    self.input_text = text.clone();
                    self.cue(Cue::Success);
                    self.submit(&text);
                }
                SessionUpdate::Error(reason) => {
                    self.notifications
                        .notify(format!("Voice recognition error: {}", reason), Kind::Error);
                    self.cue(Cue::Error);
                }
            }
        }
    }

    fn resolve_reply(&mut self, request_id: Uuid, text: String) {
        if let Some(placeholder) = self.pending.remove(&request_id) {
            self.transcript.remove_placeholder(placeholder);
        }
        self.transcript.append(MessageSender::Bot, text);
        self.cue(Cue::Message);
    }

    fn resolve_failure(&mut self, request_id: Uuid, error: &str) {
        warn!("Exchange {} failed: {}", request_id, error);
        if let Some(placeholder) = self.pending.remove(&request_id) {
            self.transcript.remove_placeholder(placeholder);
        }
        self.transcript.append(MessageSender::Bot, FALLBACK_UNREACHABLE);
        self.notifications.notify(
            ChatterError::ExchangeError(error.to_string()).user_message(),
            Kind::Error,
        );
        self.cue(Cue::Error);
    }

    fn handle_exchange_down(&mut self) {
        // Resolve whatever was still in flight, then report once.
        let stranded: Vec<Uuid> = self.pending.keys().copied().collect();
        for request_id in stranded {
            self.resolve_failure(request_id, "exchange worker stopped");
        }

        if !self.exchange_down {
            self.exchange_down = true;
            self.notifications.notify(
                ChatterError::ChannelError("exchange worker stopped".into()).user_message(),
                Kind::Error,
            );
        }
    }

    /// Toggle the voice session, translating the outcome into
    /// notifications and cues.
    pub fn toggle_voice(&mut self) {
        match self.speech.toggle() {
            Toggle::Started => self.cue(Cue::Start),
            Toggle::Stopped => self.cue(Cue::Stop),
            Toggle::Unavailable => {
                self.notifications.notify(
                    "Speech recognition is not available on this system.",
                    Kind::Error,
                );
            }
            Toggle::StartFailed(_) => {
                self.notifications.notify(
                    "Unable to access microphone. Please allow mic permission.",
                    Kind::Error,
                );
                self.cue(Cue::Error);
            }
        }
    }

    /// Clear the transcript, keeping the welcome entry.
    pub fn clear_chat(&mut self) {
        self.transcript.clear();
        self.cue(Cue::Click);
        self.notifications
            .notify("Chat cleared successfully!", Kind::Success);
    }

    /// Submit a canned quick-action query.
    pub fn quick_action(&mut self, query: &str) {
        self.cue(Cue::Click);
        self.submit(query);
    }

    /// File attachment is not implemented.
    pub fn attach(&mut self) {
        self.notifications
            .notify("File attachment feature coming soon!", Kind::Info);
        self.cue(Cue::Click);
    }

    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
        self.persist_settings();
        self.cue(Cue::Click);
    }

    /// Persist the current settings record immediately.
    pub fn persist_settings(&mut self) {
        if let Err(e) = self.settings_store.save(&self.settings) {
            warn!("Failed to save settings: {}", e);
        }
    }

    /// Number of exchanges still waiting for a reply.
    pub fn pending_exchanges(&self) -> usize {
        self.pending.len()
    }

    /// Play a cue if sound effects are enabled.
    pub fn cue(&self, cue: Cue) {
        if self.settings.sound_effects {
            sound::play(cue);
        }
    }

    /// Ask the exchange worker to shut down.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.exchange_tx.take() {
            let _ = tx.send(ExchangeCommand::Shutdown);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::TranscriptEntry;
    use crossbeam_channel::unbounded;

    fn test_state() -> (AppState, Receiver<ExchangeCommand>, Sender<ExchangeEvent>) {
        let dir = std::env::temp_dir();
        let store = SettingsStore::at_path(dir.join(format!("chatter-test-{}.json", Uuid::new_v4())));
        let mut state = AppState::with_parts(store, SpeechSession::new(None));

        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        state.connect_exchange(command_tx, event_rx);
        (state, command_rx, event_tx)
    }

    #[test]
    fn test_empty_submit_is_a_no_op() {
        let (mut state, command_rx, _event_tx) = test_state();

        state.submit("");
        state.submit("   \t  ");

        assert!(state.transcript.messages().is_empty());
        assert_eq!(state.transcript.pending_count(), 0);
        assert!(command_rx.try_recv().is_err());
    }

    #[test]
    fn test_submit_echoes_then_posts() {
        let (mut state, command_rx, _event_tx) = test_state();
        state.input_text = "Hello".to_string();

        state.submit("Hello");

        let messages = state.transcript.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, MessageSender::User);
        assert_eq!(messages[0].text, "Hello");
        assert_eq!(state.transcript.pending_count(), 1);
        assert!(state.input_text.is_empty());

        match command_rx.try_recv().unwrap() {
            ExchangeCommand::Send { text, .. } => assert_eq!(text, "Hello"),
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_submit_trims_input() {
        let (mut state, command_rx, _event_tx) = test_state();

        state.submit("  Hello  ");

        assert_eq!(state.transcript.messages()[0].text, "Hello");
        match command_rx.try_recv().unwrap() {
            ExchangeCommand::Send { text, .. } => assert_eq!(text, "Hello"),
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_reply_resolves_placeholder() {
        let (mut state, command_rx, event_tx) = test_state();

        state.submit("Hello");
        let request_id = match command_rx.try_recv().unwrap() {
            ExchangeCommand::Send { request_id, .. } => request_id,
            other => panic!("Unexpected command: {:?}", other),
        };

        event_tx
            .send(ExchangeEvent::Reply {
                text: "Hi there!".to_string(),
                request_id,
            })
            .unwrap();
        state.poll_events();

        let messages = state.transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, MessageSender::Bot);
        assert_eq!(messages[1].text, "Hi there!");
        assert_eq!(state.transcript.pending_count(), 0);
    }

    #[test]
    fn test_failure_renders_fallback_and_notifies() {
        let (mut state, command_rx, event_tx) = test_state();

        state.submit("test");
        let request_id = match command_rx.try_recv().unwrap() {
            ExchangeCommand::Send { request_id, .. } => request_id,
            other => panic!("Unexpected command: {:?}", other),
        };

        event_tx
            .send(ExchangeEvent::Failed {
                error: "connection refused".to_string(),
                request_id,
            })
            .unwrap();
        state.poll_events();

        let messages = state.transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, FALLBACK_UNREACHABLE);
        assert_eq!(state.transcript.pending_count(), 0);

        let toasts = state.notifications.active();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, Kind::Error);
    }

    #[test]
    fn test_interleaved_exchanges_resolve_their_own_placeholders() {
        let (mut state, command_rx, event_tx) = test_state();

        state.submit("first");
        state.submit("second");

        let first_id = match command_rx.try_recv().unwrap() {
            ExchangeCommand::Send { request_id, .. } => request_id,
            other => panic!("Unexpected command: {:?}", other),
        };
        let second_id = match command_rx.try_recv().unwrap() {
            ExchangeCommand::Send { request_id, .. } => request_id,
            other => panic!("Unexpected command: {:?}", other),
        };
        assert_eq!(state.pending_exchanges(), 2);

        // Replies land out of send order.
        event_tx
            .send(ExchangeEvent::Reply {
                text: "reply two".to_string(),
                request_id: second_id,
            })
            .unwrap();
        state.poll_events();
        assert_eq!(state.transcript.pending_count(), 1);

        event_tx
            .send(ExchangeEvent::Reply {
                text: "reply one".to_string(),
                request_id: first_id,
            })
            .unwrap();
        state.poll_events();

        assert_eq!(state.transcript.pending_count(), 0);
        let texts: Vec<String> = state
            .transcript
            .messages()
            .iter()
            .map(|m| m.text.clone())
            .collect();
        assert_eq!(texts, vec!["first", "second", "reply two", "reply one"]);
    }

    #[test]
    fn test_clear_then_late_reply_still_renders() {
        let (mut state, command_rx, event_tx) = test_state();

        state.submit("question");
        let request_id = match command_rx.try_recv().unwrap() {
            ExchangeCommand::Send { request_id, .. } => request_id,
            other => panic!("Unexpected command: {:?}", other),
        };

        state.clear_chat();
        assert!(state.transcript.messages().is_empty());

        event_tx
            .send(ExchangeEvent::Reply {
                text: "late".to_string(),
                request_id,
            })
            .unwrap();
        state.poll_events();

        // The reply lands in the fresh transcript with seq 1.
        let messages = state.transcript.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].seq, 1);
        assert_eq!(messages[0].text, "late");
    }

    #[test]
    fn test_worker_disconnect_resolves_pending_and_reports_once() {
        let (mut state, _command_rx, event_tx) = test_state();

        state.submit("stranded");
        drop(event_tx);

        state.poll_events();
        let messages = state.transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, FALLBACK_UNREACHABLE);
        assert_eq!(state.transcript.pending_count(), 0);

        // Failure toast + generic restart toast, reported once.
        assert_eq!(state.notifications.active().len(), 2);
        state.poll_events();
        assert_eq!(state.notifications.active().len(), 2);
    }

    #[test]
    fn test_submit_without_worker_fails_the_exchange() {
        let dir = std::env::temp_dir();
        let store =
            SettingsStore::at_path(dir.join(format!("chatter-test-{}.json", Uuid::new_v4())));
        let mut state = AppState::with_parts(store, SpeechSession::new(None));

        state.submit("anyone there?");

        let messages = state.transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, FALLBACK_UNREACHABLE);
        assert_eq!(state.transcript.pending_count(), 0);
    }

    #[test]
    fn test_clear_resets_sequence_for_next_message() {
        let (mut state, _command_rx, _event_tx) = test_state();

        state.submit("one");
        state.submit("two");
        state.clear_chat();

        state.submit("fresh");
        let messages = state.transcript.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].seq, 1);

        let entries = state.transcript.entries();
        assert!(matches!(entries[0], TranscriptEntry::Welcome));
    }

    #[test]
    fn test_voice_toggle_without_recognizer_notifies() {
        let (mut state, _command_rx, _event_tx) = test_state();

        state.toggle_voice();

        let toasts = state.notifications.active();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, Kind::Error);
        assert!(!state.speech.is_listening());
    }

    #[test]
    fn test_attach_is_a_placeholder() {
        let (mut state, _command_rx, _event_tx) = test_state();

        state.attach();

        let toasts = state.notifications.active();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, Kind::Info);
        assert!(toasts[0].text.contains("coming soon"));
    }

    #[test]
    fn test_quick_action_submits_query() {
        let (mut state, command_rx, _event_tx) = test_state();

        state.quick_action(QUICK_ACTIONS[0]);

        assert_eq!(state.transcript.messages()[0].text, QUICK_ACTIONS[0]);
        assert!(command_rx.try_recv().is_ok());
    }
}
