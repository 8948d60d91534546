pub(crate) mod capture;
mod probe;
mod resampler;

pub(crate) use resampler::{Resampler, downmix_to_mono};

pub use {
    capture::{CaptureConfig, CaptureDevice, CaptureHandle, CpalCaptureDevice},
    probe::{MediaProber, WavProber},
};
