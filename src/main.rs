use anyhow::Result;
use chatter::exchange::{ExchangeConfig, ExchangePipeline};
use chatter::settings::SettingsStore;
use chatter::speech::SpeechSession;
use chatter::ui::{AppState, ChatterApp};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatter=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Anything that slips past the per-component handling is logged
    // before the process dies.
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Unhandled error: {}", panic_info);
    }));

    info!("Starting Chatter");

    let endpoint = std::env::var("CHATTER_ENDPOINT")
        .unwrap_or_else(|_| ExchangeConfig::default().endpoint);
    let pipeline = ExchangePipeline::new(ExchangeConfig::with_endpoint(endpoint));
    let command_tx = pipeline.command_sender();
    let event_rx = pipeline.event_receiver();
    pipeline.start_worker()?;

    #[cfg(feature = "audio-io")]
    let recognizer = chatter::speech::default_recognizer(chatter::speech::WhisperConfig::default());
    #[cfg(not(feature = "audio-io"))]
    let recognizer = chatter::speech::default_recognizer();

    let mut state = AppState::with_parts(SettingsStore::new(), SpeechSession::new(recognizer));
    state.connect_exchange(command_tx, event_rx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chatter",
        options,
        Box::new(move |cc| Ok(Box::new(ChatterApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run UI: {e}"))
}
