//! Microphone-backed recognizer.
//!
//! Capture runs continuously once started; an endpointing worker
//! segments the stream into utterances with the voice activity
//! detector and transcribes each one. Every finished utterance is
//! followed by `Ended`, preserving the single-shot contract.

use crate::audio::{MicCapture, MonoResampler, SpeechDetector, RECOGNIZER_SAMPLE_RATE};
use crate::audio::vad::VAD_CHUNK_SIZE;
use crate::speech::recognizer::{Recognizer, RecognizerEvent};
use crate::speech::stt::{WhisperConfig, WhisperEngine};
use crate::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct MicRecognizer {
    config: WhisperConfig,
    engine: Arc<WhisperEngine>,
    capture: MicCapture,
    event_tx: Sender<RecognizerEvent>,
    event_rx: Receiver<RecognizerEvent>,
}

impl MicRecognizer {
    /// Probes the input device and loads the speech model. Either
    /// failing means speech input is unavailable.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        let capture = MicCapture::new()?;
        let engine = Arc::new(WhisperEngine::new(config.clone())?);
        let (event_tx, event_rx) = bounded(100);

        Ok(Self {
            config,
            engine,
            capture,
            event_tx,
            event_rx,
        })
    }
}

impl Recognizer for MicRecognizer {
    fn start(&mut self) -> Result<()> {
        let (audio_tx, audio_rx) = bounded::<Vec<f32>>(64);

        // Errors here include "capture already running", which the
        // session swallows when it auto-restarts after an utterance.
        self.capture.start(audio_tx)?;

        let worker = EndpointWorker {
            config: self.config.clone(),
            engine: Arc::clone(&self.engine),
            device_rate: self.capture.sample_rate(),
            event_tx: self.event_tx.clone(),
        };

        std::thread::spawn(move || worker.run(audio_rx));

        Ok(())
    }

    fn stop(&mut self) {
        // Dropping the stream disconnects the audio channel, which
        // ends the endpointing worker.
        self.capture.stop();
    }

    fn events(&self) -> Receiver<RecognizerEvent> {
        self.event_rx.clone()
    }
}

struct EndpointWorker {
    config: WhisperConfig,
    engine: Arc<WhisperEngine>,
    device_rate: u32,
    event_tx: Sender<RecognizerEvent>,
}

impl EndpointWorker {
    fn run(self, audio_rx: Receiver<Vec<f32>>) {
        info!("Endpointing worker started ({} Hz input)", self.device_rate);

        let mut resampler = match MonoResampler::new(self.device_rate, RECOGNIZER_SAMPLE_RATE) {
            Ok(r) => r,
            Err(e) => {
                let _ = self.event_tx.send(RecognizerEvent::Error(e.to_string()));
                return;
            }
        };
        let mut detector = match SpeechDetector::new(self.config.vad_threshold) {
            Ok(d) => d,
            Err(e) => {
                let _ = self.event_tx.send(RecognizerEvent::Error(e.to_string()));
                return;
            }
        };

        // 16 kHz samples waiting to be classified, and the utterance
        // being accumulated.
        let mut vad_pending: Vec<f32> = Vec::new();
        let mut utterance: Vec<f32> = Vec::new();
        let mut in_speech = false;
        let mut silence_secs = 0.0_f32;

        while let Ok(chunk) = audio_rx.recv() {
            let resampled = match resampler.feed(&chunk) {
                Ok(samples) => samples,
                Err(e) => {
                    let _ = self.event_tx.send(RecognizerEvent::Error(e.to_string()));
                    return;
                }
            };
            vad_pending.extend_from_slice(&resampled);

            while vad_pending.len() >= VAD_CHUNK_SIZE {
                let frame: Vec<f32> = vad_pending.drain(..VAD_CHUNK_SIZE).collect();
                let frame_secs = VAD_CHUNK_SIZE as f32 / RECOGNIZER_SAMPLE_RATE as f32;

                if detector.is_speech(&frame) {
                    if !in_speech {
                        debug!("Speech started");
                        in_speech = true;
                        utterance.clear();
                    }
                    utterance.extend_from_slice(&frame);
                    silence_secs = 0.0;

                    let utterance_secs =
                        utterance.len() as f32 / RECOGNIZER_SAMPLE_RATE as f32;
                    if utterance_secs >= self.config.max_utterance_duration {
                        self.finish_utterance(&mut utterance);
                        in_speech = false;
                        silence_secs = 0.0;
                    }
                } else if in_speech {
                    utterance.extend_from_slice(&frame);
                    silence_secs += frame_secs;

                    if silence_secs >= self.config.silence_threshold {
                        let utterance_secs =
                            utterance.len() as f32 / RECOGNIZER_SAMPLE_RATE as f32;
                        if utterance_secs >= self.config.min_utterance_duration {
                            self.finish_utterance(&mut utterance);
                        } else {
                            debug!("Discarding short segment ({:.2}s)", utterance_secs);
                            utterance.clear();
                        }
                        in_speech = false;
                        silence_secs = 0.0;
                    }
                }
            }
        }

        info!("Endpointing worker stopped");
    }

    /// Transcribe the accumulated utterance and emit the result
    /// followed by `Ended`.
    fn finish_utterance(&self, utterance: &mut Vec<f32>) {
        let samples = std::mem::take(utterance);

        match self.engine.transcribe(&samples) {
            Ok(text) if !text.is_empty() => {
                let _ = self.event_tx.send(RecognizerEvent::Utterance(text));
                let _ = self.event_tx.send(RecognizerEvent::Ended);
            }
            Ok(_) => {
                debug!("Utterance transcribed to nothing");
                let _ = self.event_tx.send(RecognizerEvent::Ended);
            }
            Err(e) => {
                warn!("Transcription failed: {}", e);
                let _ = self.event_tx.send(RecognizerEvent::Error(e.to_string()));
            }
        }
    }
}
