#[cfg(feature = "audio-io")]
pub mod audio;
pub mod exchange;
pub mod messages;
pub mod notify;
pub mod settings;
pub mod sound;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChatterError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Model load error: {0}")]
    ModelLoadError(String),

    #[error("Recognition error: {0}")]
    RecognitionError(String),

    #[error("Exchange error: {0}")]
    ExchangeError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for ChatterError {
    fn from(e: std::io::Error) -> Self {
        ChatterError::IOError(e.to_string())
    }
}

impl ChatterError {
    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ChatterError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            ChatterError::ModelLoadError(_) => {
                "Failed to load the speech model. Please verify model files are present.".to_string()
            }
            ChatterError::RecognitionError(e) => {
                format!("Voice recognition error: {}", e)
            }
            ChatterError::ExchangeError(_) => {
                "Could not reach the server. Please try again later.".to_string()
            }
            ChatterError::IOError(_) => "File system error occurred.".to_string(),
            ChatterError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            ChatterError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            ChatterError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatterError>;
