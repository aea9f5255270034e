use crate::{ChatterError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Mono resampler between the device rate and the recognizer rate.
pub struct MonoResampler {
    resampler: SincFixedIn<f32>,
    input_rate: u32,
    output_rate: u32,
    /// Samples carried over until a full chunk is available.
    pending: Vec<f32>,
}

impl MonoResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(ChatterError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let resample_ratio = output_rate as f64 / input_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let chunk_size = 1024;

        let resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, chunk_size, 1)
            .map_err(|e| {
                ChatterError::AudioProcessingError(format!("Failed to create resampler: {}", e))
            })?;

        debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
            pending: Vec::new(),
        })
    }

    /// Feed device-rate samples, returning whatever full chunks
    /// resample to. A trailing partial chunk is buffered until the
    /// next call.
    pub fn feed(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if self.input_rate == self.output_rate {
            let mut out = std::mem::take(&mut self.pending);
            out.extend_from_slice(input);
            return Ok(out);
        }

        self.pending.extend_from_slice(input);

        let chunk_size = self.resampler.input_frames_max();
        let mut output = Vec::new();

        while self.pending.len() >= chunk_size {
            let chunk: Vec<f32> = self.pending.drain(..chunk_size).collect();
            let planar = self
                .resampler
                .process(&[chunk], None)
                .map_err(|e| {
                    ChatterError::AudioProcessingError(format!("Resampling failed: {}", e))
                })?;
            output.extend_from_slice(&planar[0]);
        }

        Ok(output)
    }

    /// Drop buffered samples and reset filter state.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.resampler.reset();
    }

    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }
}
