//! Microphone capture and the processing steps between the device
//! and the recognizer: downmixing, resampling to 16 kHz, and voice
//! activity detection.

pub mod input;
pub mod resampler;
pub mod vad;

pub use input::MicCapture;
pub use resampler::MonoResampler;
pub use vad::SpeechDetector;

/// Sample rate the recognizer consumes.
pub const RECOGNIZER_SAMPLE_RATE: u32 = 16_000;
