use crate::{
    ClipError, ClipResult,
    audio::{Resampler, downmix_to_mono},
};

use std::{
    collections::VecDeque,
    fs::File,
    io::BufWriter,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
    time::Duration,
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error, info, instrument, warn};

/// Maximum samples to buffer (10 minutes at 48kHz mono).
///
/// Clips are short; anything older than this is dropped from the front.
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 10;

const DEFAULT_SAMPLE_RATE: u32 = 12_000;
const DEFAULT_CHANNELS: u16 = 1;

/// Fixed format recordings are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Sample rate of the written file, in Hz.
    pub sample_rate: u32,
    /// Channel count of the written file.
    pub channels: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

/// Opens capture targets.
pub trait CaptureDevice: Send + Sync {
    /// Open a writable capture target at `path`.
    ///
    /// The file must exist once this returns `Ok`. Failures are reported as
    /// [`ClipError::RecorderInitFailed`].
    fn open(&self, path: &Path, config: &CaptureConfig) -> ClipResult<Box<dyn CaptureHandle>>;
}

/// An open capture bound to one file.
pub trait CaptureHandle: Send {
    /// Start or resume writing audio.
    fn record(&mut self) -> ClipResult<()>;

    /// Suspend writing audio, keeping the target open.
    fn pause(&mut self) -> ClipResult<()>;

    /// Finish the capture and close the target. The handle is unusable after.
    fn stop(&mut self) -> ClipResult<()>;
}

/// [`CaptureDevice`] using the default cpal input device.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalCaptureDevice;

impl CaptureDevice for CpalCaptureDevice {
    #[track_caller]
    fn open(&self, path: &Path, config: &CaptureConfig) -> ClipResult<Box<dyn CaptureHandle>> {
        Ok(Box::new(CpalCapture::open(path, *config)?))
    }
}

struct CpalCapture {
    path: PathBuf,
    device: Device,
    stream_config: StreamConfig,
    target: CaptureConfig,
    stream: Option<Stream>,
    writer: Option<WavWriter<BufWriter<File>>>,
    samples: Arc<Mutex<VecDeque<f32>>>,
    /// Set before the stream is dropped so a late callback writes nothing.
    shutdown: Arc<AtomicBool>,
}

impl CpalCapture {
    #[track_caller]
    #[instrument(skip(target))]
    fn open(path: &Path, target: CaptureConfig) -> ClipResult<Self> {
        let init_failed = |reason: String| ClipError::RecorderInitFailed {
            path: path.to_path_buf(),
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| init_failed("No microphone found".to_string()))?;

        let input_config = device
            .default_input_config()
            .map_err(|e| init_failed(format!("Failed to get input config: {}", e)))?;

        let spec = WavSpec {
            channels: target.channels,
            sample_rate: target.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path, spec)
            .map_err(|e| init_failed(format!("Failed to create WAV target: {}", e)))?;

        info!(
            path = ?path,
            device_rate = input_config.sample_rate(),
            device_channels = input_config.channels(),
            target_rate = target.sample_rate,
            "Capture target opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            device,
            stream_config: input_config.into(),
            target,
            stream: None,
            writer: Some(writer),
            samples: Arc::new(Mutex::new(VecDeque::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    #[track_caller]
    fn build_stream(&self) -> ClipResult<Stream> {
        let samples = Arc::clone(&self.samples);
        let shutdown = Arc::clone(&self.shutdown);

        self.device
            .build_input_stream(
                &self.stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    buf.extend(data.iter().copied());
                    while buf.len() > MAX_BUFFER_SAMPLES {
                        buf.pop_front();
                    }
                },
                |err| {
                    error!("Capture stream error: {}", err);
                },
                None,
            )
            .map_err(|e| ClipError::DeviceError {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    #[track_caller]
    fn write_out(&mut self, interleaved: Vec<f32>) -> ClipResult<()> {
        let Some(mut writer) = self.writer.take() else {
            return Err(ClipError::DeviceError {
                reason: "Capture already stopped".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let mono = downmix_to_mono(&interleaved, self.stream_config.channels);
        let device_rate = self.stream_config.sample_rate;
        let mono = if device_rate != self.target.sample_rate {
            Resampler::new(device_rate, self.target.sample_rate)?.resample(&mono)?
        } else {
            mono
        };

        let write_failed = |e: hound::Error| ClipError::DeviceError {
            reason: format!("Failed to write WAV: {}", e),
            location: ErrorLocation::from(Location::caller()),
        };

        for &sample in &mono {
            let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            for _ in 0..self.target.channels {
                writer.write_sample(value).map_err(write_failed)?;
            }
        }
        writer.finalize().map_err(write_failed)?;

        debug!(path = ?self.path, frames = mono.len(), "Capture written");

        Ok(())
    }
}

impl CaptureHandle for CpalCapture {
    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.path))]
    fn record(&mut self) -> ClipResult<()> {
        if self.stream.is_none() {
            self.stream = Some(self.build_stream()?);
        }

        if let Some(stream) = &self.stream {
            stream.play().map_err(|e| ClipError::DeviceError {
                reason: format!("Failed to start stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        debug!("Capture running");

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.path))]
    fn pause(&mut self) -> ClipResult<()> {
        let Some(stream) = &self.stream else {
            warn!("Pause requested before capture started");
            return Ok(());
        };

        stream.pause().map_err(|e| ClipError::DeviceError {
            reason: format!("Failed to pause stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!("Capture paused");

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self), fields(path = ?self.path))]
    fn stop(&mut self) -> ClipResult<()> {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Let an in-flight callback observe the shutdown flag.
            std::thread::sleep(Duration::from_millis(5));
        }

        let captured: Vec<f32> = self
            .samples
            .lock()
            .unwrap_or_else(|e| {
                error!("Sample buffer lock poisoned, recovering: {}", e);
                e.into_inner()
            })
            .drain(..)
            .collect();

        self.write_out(captured)?;

        info!("Capture stopped");

        Ok(())
    }
}
