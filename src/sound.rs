//! Short feedback tones keyed by UI event.

/// Which tone to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Button/control interaction
    Click,
    /// Bot reply arrived
    Message,
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// Voice session started
    Start,
    /// Voice session stopped
    Stop,
}

impl Cue {
    fn frequency(self) -> f32 {
        match self {
            Cue::Click => 800.0,
            Cue::Message => 600.0,
            Cue::Success => 1000.0,
            Cue::Error => 300.0,
            Cue::Start => 500.0,
            Cue::Stop => 400.0,
        }
    }
}

/// Play a cue. Spawns a thread and returns immediately; playback
/// failures are logged and swallowed. The caller is responsible for
/// honoring the sound-effects setting.
#[cfg(feature = "audio-io")]
pub fn play(cue: Cue) {
    std::thread::spawn(move || {
        if let Err(e) = play_blocking(cue) {
            tracing::warn!("Sound cue failed: {}", e);
        }
    });
}

#[cfg(not(feature = "audio-io"))]
pub fn play(cue: Cue) {
    tracing::trace!("Sound cue {:?} skipped (audio-io disabled)", cue);
}

#[cfg(feature = "audio-io")]
fn play_blocking(cue: Cue) -> crate::Result<()> {
    use crate::ChatterError;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::f32::consts::PI;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| ChatterError::AudioDeviceError("No output device available".into()))?;
    let config = device
        .default_output_config()
        .map_err(|e| ChatterError::AudioDeviceError(format!("Failed to get output config: {}", e)))?;
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let duration_secs = 0.1_f32;
    let total_samples = (sample_rate * duration_secs) as usize;
    let frequency = cue.frequency();

    // Pre-generate the tone with an exponential fade-out.
    let mut samples = Vec::with_capacity(total_samples);
    for i in 0..total_samples {
        let t = i as f32 / sample_rate;
        let progress = i as f32 / total_samples as f32;
        let envelope = 0.1 * 0.1_f32.powf(progress);
        samples.push((2.0 * PI * frequency * t).sin() * envelope);
    }

    let samples = Arc::new(samples);
    let sample_idx = Arc::new(AtomicUsize::new(0));
    let samples_cb = Arc::clone(&samples);
    let sample_idx_cb = Arc::clone(&sample_idx);
    let total = total_samples;

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut idx = sample_idx_cb.load(Ordering::Relaxed);
                for frame in data.chunks_mut(channels) {
                    let value = if idx < total { samples_cb[idx] } else { 0.0 };
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                    idx += 1;
                }
                sample_idx_cb.store(idx, Ordering::Relaxed);
            },
            |err| tracing::error!("Audio output error: {}", err),
            None,
        )
        .map_err(|e| ChatterError::AudioDeviceError(format!("Failed to build output stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| ChatterError::AudioDeviceError(format!("Failed to start output stream: {}", e)))?;

    // Let the tone finish before the stream is dropped.
    std::thread::sleep(std::time::Duration::from_millis(150));

    drop(stream);
    Ok(())
}
