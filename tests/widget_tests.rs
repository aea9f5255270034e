//! End-to-end tests over the application state: submit, transcript,
//! speech session, and settings behavior working together.

use chatter::exchange::{ExchangeConfig, ExchangePipeline, FALLBACK_UNREACHABLE};
use chatter::messages::{Sender, TranscriptEntry};
use chatter::settings::SettingsStore;
use chatter::speech::{Recognizer, RecognizerEvent, SpeechSession};
use chatter::ui::AppState;
use crossbeam_channel::{unbounded, Receiver, Sender as ChannelSender};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Recognizer driven by the test through a channel.
struct ScriptedRecognizer {
    event_rx: Receiver<RecognizerEvent>,
}

impl ScriptedRecognizer {
    fn new() -> (Self, ChannelSender<RecognizerEvent>) {
        let (event_tx, event_rx) = unbounded();
        (Self { event_rx }, event_tx)
    }
}

impl Recognizer for ScriptedRecognizer {
    fn start(&mut self) -> chatter::Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn events(&self) -> Receiver<RecognizerEvent> {
        self.event_rx.clone()
    }
}

fn fresh_state(dir: &tempfile::TempDir, recognizer: Option<Box<dyn Recognizer>>) -> AppState {
    let store = SettingsStore::at_path(dir.path().join("settings.json"));
    let mut state = AppState::with_parts(store, SpeechSession::new(recognizer));
    // Sound devices are not assumed to exist where tests run.
    state.settings.sound_effects = false;
    state
}

/// Poll until all in-flight exchanges resolved or the deadline hits.
fn settle(state: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while state.pending_exchanges() > 0 {
        assert!(Instant::now() < deadline, "exchange never resolved");
        state.poll_events();
        std::thread::sleep(Duration::from_millis(20));
    }
}

fn connect_backend(state: &mut AppState, endpoint: String) {
    let pipeline = ExchangePipeline::new(ExchangeConfig::with_endpoint(endpoint));
    let command_tx = pipeline.command_sender();
    let event_rx = pipeline.event_receiver();
    pipeline.start_worker().unwrap();
    state.connect_exchange(command_tx, event_rx);
}

#[tokio::test(flavor = "multi_thread")]
async fn typed_question_gets_an_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_response"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "Hi there!"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut state = fresh_state(&dir, None);
    connect_backend(&mut state, format!("{}/get_response", server.uri()));

    state.submit("Hello");
    settle(&mut state);

    let messages = state.transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].text, "Hello");
    assert_eq!(messages[1].sender, Sender::Bot);
    assert_eq!(messages[1].text, "Hi there!");
}

#[tokio::test(flavor = "multi_thread")]
async fn dead_backend_shows_the_error_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = fresh_state(&dir, None);
    connect_backend(&mut state, "http://127.0.0.1:9/get_response".to_string());

    state.submit("test");
    settle(&mut state);

    let messages = state.transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].text, FALLBACK_UNREACHABLE);
    assert!(!state.notifications.active().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn markup_in_input_is_escaped_for_display() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_response"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "noted"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut state = fresh_state(&dir, None);
    connect_backend(&mut state, format!("{}/get_response", server.uri()));

    state.submit("<script>");
    settle(&mut state);

    let entries = state.transcript.entries();
    let display = entries
        .iter()
        .find_map(|e| match e {
            TranscriptEntry::Message {
                message,
                display_text,
            } if message.sender == Sender::User => Some(display_text.clone()),
            _ => None,
        })
        .unwrap();
    assert!(display.contains("&lt;script&gt;"));
    assert!(!display.contains("<script>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn spoken_utterance_is_submitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_response"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "The library is open 8am to 10pm."
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (recognizer, event_tx) = ScriptedRecognizer::new();
    let mut state = fresh_state(&dir, Some(Box::new(recognizer)));
    connect_backend(&mut state, format!("{}/get_response", server.uri()));

    state.toggle_voice();
    assert!(state.speech.is_listening());

    event_tx
        .send(RecognizerEvent::Utterance("library hours".to_string()))
        .unwrap();
    event_tx.send(RecognizerEvent::Ended).unwrap();
    state.poll_events();
    settle(&mut state);

    let messages = state.transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "library hours");
    assert_eq!(messages[1].text, "The library is open 8am to 10pm.");

    // Still listening: the session auto-restarted after the utterance.
    assert!(state.speech.is_listening());
}

#[tokio::test(flavor = "multi_thread")]
async fn recognition_error_surfaces_and_stops_listening() {
    let dir = tempfile::tempdir().unwrap();
    let (recognizer, event_tx) = ScriptedRecognizer::new();
    let mut state = fresh_state(&dir, Some(Box::new(recognizer)));

    state.toggle_voice();
    event_tx
        .send(RecognizerEvent::Error("not-allowed".to_string()))
        .unwrap();
    state.poll_events();

    assert!(!state.speech.is_listening());
    let toasts = state.notifications.active();
    assert!(toasts.iter().any(|t| t.text.contains("not-allowed")));
}

#[tokio::test(flavor = "multi_thread")]
async fn clear_keeps_welcome_and_restarts_sequence() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_response"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "ok"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut state = fresh_state(&dir, None);
    connect_backend(&mut state, format!("{}/get_response", server.uri()));

    state.submit("one");
    settle(&mut state);
    state.submit("two");
    settle(&mut state);

    state.clear_chat();
    let entries = state.transcript.entries();
    assert_eq!(entries.len(), 1);
    assert!(matches!(entries[0], TranscriptEntry::Welcome));

    state.submit("fresh start");
    settle(&mut state);
    let messages = state.transcript.messages();
    assert_eq!(messages[0].seq, 1);
    assert_eq!(messages[0].text, "fresh start");
}

#[test]
fn settings_edits_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut state = fresh_state(&dir, None);
        state.toggle_theme();
        state.settings.font_size = chatter::settings::FontSize::Large;
        state.persist_settings();
    }

    // A fresh state over the same store simulates a restart.
    let state = fresh_state(&dir, None);
    assert_eq!(state.settings.theme, chatter::settings::ThemeChoice::Light);
    assert_eq!(state.settings.font_size, chatter::settings::FontSize::Large);
}
