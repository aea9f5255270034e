use crate::{ChatterError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use tracing::{debug, error, info};

/// Microphone capture on the default input device.
///
/// Samples are downmixed to mono in the stream callback and pushed to
/// the provided channel at the device's native rate. The stream is
/// not `Send`; capture starts and stops on the thread that owns it.
pub struct MicCapture {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl MicCapture {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| ChatterError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| {
                ChatterError::AudioDeviceError(format!("Failed to get input config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    /// Native sample rate of the input device.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }

    /// Start capturing into `audio_tx`. Fails if already capturing.
    pub fn start(&mut self, audio_tx: Sender<Vec<f32>>) -> Result<()> {
        if self.stream.is_some() {
            return Err(ChatterError::AudioDeviceError(
                "Capture already running".into(),
            ));
        }

        let channels = self.config.channels as usize;

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = audio_tx.try_send(samples) {
                        debug!("Dropping audio chunk: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                ChatterError::AudioDeviceError(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            ChatterError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        self.stream = Some(stream);
        info!("Microphone capture started");
        Ok(())
    }

    /// Stop capturing. Idempotent.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Microphone capture stopped");
        }
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
