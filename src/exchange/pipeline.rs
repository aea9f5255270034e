//! Exchange pipeline for posting messages to the backend.
//!
//! Provides a channel-based interface: the UI sends commands, a
//! worker thread owning a tokio runtime and an HTTP client performs
//! the requests and emits events. Multiple requests may be in flight;
//! each event carries the request id it belongs to.

use crate::exchange::protocol::{ChatReply, ChatRequest};
use crate::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use tokio::runtime::Runtime;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Configuration for the backend exchange.
#[derive(Clone, Debug)]
pub struct ExchangeConfig {
    /// Full URL of the reply endpoint.
    pub endpoint: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/get_response".to_string(),
        }
    }
}

impl ExchangeConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

/// Commands that can be sent to the exchange worker.
#[derive(Debug, Clone)]
pub enum ExchangeCommand {
    /// Post one message to the backend.
    Send {
        /// The trimmed user message
        text: String,
        /// Unique request id for tracking
        request_id: Uuid,
    },

    /// Shutdown the worker.
    Shutdown,
}

/// Events emitted by the exchange worker.
#[derive(Debug, Clone)]
pub enum ExchangeEvent {
    /// The backend answered. The text is the reply, or the fixed
    /// fallback when the reply carried no usable `response` field.
    Reply { text: String, request_id: Uuid },

    /// The request failed (connect error, bad status, or unparseable
    /// body). Failures are terminal for the one exchange.
    Failed { error: String, request_id: Uuid },

    /// Worker has shut down.
    Shutdown,
}

/// Exchange pipeline with channel-based communication.
pub struct ExchangePipeline {
    config: ExchangeConfig,
    command_tx: Sender<ExchangeCommand>,
    command_rx: Receiver<ExchangeCommand>,
    event_tx: Sender<ExchangeEvent>,
    event_rx: Receiver<ExchangeEvent>,
}

impl ExchangePipeline {
    pub fn new(config: ExchangeConfig) -> Self {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<ExchangeCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<ExchangeEvent> {
        self.event_rx.clone()
    }

    /// Start the worker thread.
    pub fn start_worker(self) -> Result<()> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::spawn(move || {
            info!("Exchange worker starting, endpoint: {}", config.endpoint);

            let runtime = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    let _ = event_tx.send(ExchangeEvent::Shutdown);
                    return;
                }
            };

            let client = reqwest::Client::new();

            loop {
                match command_rx.recv() {
                    Ok(ExchangeCommand::Send { text, request_id }) => {
                        debug!("Posting exchange {}", request_id);

                        let result = runtime.block_on(async {
                            let response = client
                                .post(&config.endpoint)
                                .json(&ChatRequest { message: text })
                                .send()
                                .await?
                                .error_for_status()?;

                            response.json::<ChatReply>().await
                        });

                        let event = match result {
                            Ok(reply) => {
                                debug!("Exchange {} answered", request_id);
                                ExchangeEvent::Reply {
                                    text: reply.into_bot_text(),
                                    request_id,
                                }
                            }
                            Err(e) => {
                                error!("Exchange {} failed: {}", request_id, e);
                                ExchangeEvent::Failed {
                                    error: e.to_string(),
                                    request_id,
                                }
                            }
                        };

                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }

                    Ok(ExchangeCommand::Shutdown) => {
                        info!("Exchange worker shutting down");
                        let _ = event_tx.send(ExchangeEvent::Shutdown);
                        break;
                    }

                    Err(e) => {
                        error!("Command channel error: {}", e);
                        break;
                    }
                }
            }

            info!("Exchange worker stopped");
        });

        Ok(())
    }
}
