use crate::{ChatterError, Result};
use voice_activity_detector::VoiceActivityDetector;

/// Samples per VAD chunk at 16 kHz (32 ms).
pub const VAD_CHUNK_SIZE: usize = 512;

/// Speech/silence classification over 16 kHz mono chunks.
pub struct SpeechDetector {
    detector: VoiceActivityDetector,
    threshold: f32,
}

impl SpeechDetector {
    /// `threshold` is the speech probability above which a chunk
    /// counts as voiced (0.0 to 1.0).
    pub fn new(threshold: f32) -> Result<Self> {
        let detector = VoiceActivityDetector::builder()
            .sample_rate(16_000_i32)
            .chunk_size(VAD_CHUNK_SIZE)
            .build()
            .map_err(|e| {
                ChatterError::AudioProcessingError(format!("Failed to create VAD: {:?}", e))
            })?;

        Ok(Self {
            detector,
            threshold: threshold.clamp(0.0, 1.0),
        })
    }

    /// Whether the chunk contains speech.
    pub fn is_speech(&mut self, chunk: &[f32]) -> bool {
        self.detector.predict(chunk.iter().copied()) >= self.threshold
    }

    pub fn reset(&mut self) {
        self.detector.reset();
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}
