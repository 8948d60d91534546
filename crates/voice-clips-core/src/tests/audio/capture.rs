use crate::{
    CaptureConfig, CaptureDevice, CpalCaptureDevice, audio::capture::MAX_BUFFER_SAMPLES,
};

use std::{collections::VecDeque, thread, time::Duration};

/// WHAT: The sample ring keeps the newest audio once full
/// WHY: A capture left running must not grow memory without bound
#[test]
fn given_ring_at_capacity_when_appending_then_oldest_samples_dropped() {
    // Given: A ring filled with silence up to the limit
    let mut ring: VecDeque<f32> = std::iter::repeat_n(0.0f32, MAX_BUFFER_SAMPLES).collect();

    // When: One more callback worth of audio arrives
    ring.extend([1.0f32; 480]);
    while ring.len() > MAX_BUFFER_SAMPLES {
        ring.pop_front();
    }

    // Then: Length is capped and the tail is the new audio
    assert_eq!(ring.len(), MAX_BUFFER_SAMPLES);
    assert!(ring.iter().rev().take(480).all(|s| (*s - 1.0).abs() < f32::EPSILON));
    assert!((ring[0]).abs() < f32::EPSILON);
}

/// WHAT: The ring holds ten minutes of 48kHz mono audio
/// WHY: Clips are short; ten minutes is the documented ceiling
#[test]
fn given_buffer_limit_when_inspecting_then_ten_minutes_at_48khz() {
    assert_eq!(MAX_BUFFER_SAMPLES, 48_000 * 600);
}

/// WHAT: Default capture format is 12kHz mono
/// WHY: Voice clips are stored small, in one fixed format
#[test]
fn given_default_config_when_inspecting_then_12khz_mono() {
    let config = CaptureConfig::default();

    assert_eq!(config.sample_rate, 12000);
    assert_eq!(config.channels, 1);
}

/// WHAT: The cpal device writes a readable WAV in the target format
/// WHY: Verifies default input device, downmix and resample wiring end to end
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_real_input_device_when_capturing_briefly_then_wav_in_target_format() {
    // Given: A target path in a temp directory
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hardware.wav");

    // When: Opening, recording briefly, pausing and stopping
    let mut handle = CpalCaptureDevice
        .open(&path, &CaptureConfig::default())
        .unwrap();
    assert!(path.exists());
    handle.record().unwrap();
    thread::sleep(Duration::from_millis(200));
    handle.pause().unwrap();
    handle.stop().unwrap();

    // Then: The file is 12kHz mono
    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, 12000);
    assert_eq!(reader.spec().channels, 1);
}
