use crate::{ChatterError, Result};
use std::path::PathBuf;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Configuration for the Whisper speech-to-text engine.
#[derive(Clone, Debug)]
pub struct WhisperConfig {
    /// Path to the Whisper model file
    pub model_path: PathBuf,

    /// Recognition language (fixed, no auto-detection)
    pub language: String,

    /// Number of threads to use for transcription
    pub n_threads: i32,

    /// Speech probability threshold for the voice activity detector
    pub vad_threshold: f32,

    /// Silence duration that ends an utterance (seconds)
    pub silence_threshold: f32,

    /// Minimum utterance duration worth transcribing (seconds)
    pub min_utterance_duration: f32,

    /// Maximum utterance duration before forcing transcription (seconds)
    pub max_utterance_duration: f32,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: "en".to_string(),
            n_threads: 4,
            vad_threshold: 0.5,
            silence_threshold: 0.8,
            min_utterance_duration: 0.5,
            max_utterance_duration: 30.0,
        }
    }
}

/// Whisper speech-to-text engine. `transcribe` is `&self`; each call
/// gets its own decoding state.
pub struct WhisperEngine {
    config: WhisperConfig,
    context: WhisperContext,
}

impl WhisperEngine {
    pub fn new(config: WhisperConfig) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", config.model_path);

        if !config.model_path.exists() {
            return Err(ChatterError::ModelLoadError(format!(
                "Model file not found: {:?}",
                config.model_path
            )));
        }

        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| ChatterError::ModelLoadError("Invalid model path".to_string()))?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| {
            ChatterError::ModelLoadError(format!("Failed to load Whisper model: {:?}", e))
        })?;

        info!("Whisper model loaded");

        Ok(Self { config, context })
    }

    /// Transcribe one utterance (mono, f32, 16 kHz).
    pub fn transcribe(&self, samples: &[f32]) -> Result<String> {
        if samples.is_empty() {
            return Err(ChatterError::RecognitionError("Empty utterance".to_string()));
        }

        debug!("Transcribing {} samples", samples.len());

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.n_threads);
        params.set_language(Some(&self.config.language));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        let mut state = self.context.create_state().map_err(|e| {
            ChatterError::RecognitionError(format!("Failed to create state: {:?}", e))
        })?;

        state.full(params, samples).map_err(|e| {
            ChatterError::RecognitionError(format!("Transcription failed: {:?}", e))
        })?;

        let num_segments = state.full_n_segments().map_err(|e| {
            ChatterError::RecognitionError(format!("Failed to get segments: {:?}", e))
        })?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment_text = state.full_get_segment_text(i).map_err(|e| {
                ChatterError::RecognitionError(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment_text);
        }

        let text = text.trim().to_string();
        debug!("Transcription result: '{}'", text);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = WhisperConfig::default();
        assert_eq!(config.language, "en");
        assert_eq!(config.n_threads, 4);
        assert!(config.silence_threshold > 0.0);
        assert!(config.min_utterance_duration < config.max_utterance_duration);
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let config = WhisperConfig {
            model_path: PathBuf::from("/definitely/not/here.bin"),
            ..WhisperConfig::default()
        };
        assert!(WhisperEngine::new(config).is_err());
    }
}
