//! Fakes and fixtures shared by the core tests.

use crate::{
    CaptureConfig, CaptureDevice, CaptureHandle, ClipError, ClipResult, Clock, Collaborators,
    FileAccessor, FileRef, ListedFile, MediaProber, NameOverrideStore, RecordingSession,
    RecordingStore, RecordingsCatalog, SystemFileAccessor, VoiceClips, VoiceClipsOptions,
    WavProber,
};

use std::{
    fs::File,
    io::{self, BufWriter},
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use chrono::{DateTime, Local, TimeDelta, TimeZone};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::TempDir;

/// Seconds of audio the fake device writes per `record()` call.
pub(crate) const SECONDS_PER_RECORD: f64 = 0.5;

/// Clock that only moves when told to.
pub(crate) struct ManualClock {
    base: Instant,
    wall: DateTime<Local>,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            base: Instant::now(),
            wall: Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }

    fn wall_time(&self) -> DateTime<Local> {
        self.wall + TimeDelta::from_std(*self.offset.lock().unwrap()).unwrap()
    }
}

/// Capture device writing silent WAV files, recording every call it sees.
pub(crate) struct FakeCaptureDevice {
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
    pub(crate) fail_open: bool,
}

impl FakeCaptureDevice {
    pub(crate) fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_open: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new()
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CaptureDevice for FakeCaptureDevice {
    fn open(&self, path: &Path, config: &CaptureConfig) -> ClipResult<Box<dyn CaptureHandle>> {
        self.calls.lock().unwrap().push("open".to_string());

        if self.fail_open {
            return Err(ClipError::RecorderInitFailed {
                path: path.to_path_buf(),
                reason: "device unavailable".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let writer = WavWriter::create(path, wav_spec(config)).unwrap();

        Ok(Box::new(FakeCapture {
            writer: Some(writer),
            sample_rate: config.sample_rate,
            records: 0,
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct FakeCapture {
    writer: Option<WavWriter<BufWriter<File>>>,
    sample_rate: u32,
    records: u32,
    calls: Arc<Mutex<Vec<String>>>,
}

impl CaptureHandle for FakeCapture {
    fn record(&mut self) -> ClipResult<()> {
        self.calls.lock().unwrap().push("record".to_string());
        self.records += 1;
        Ok(())
    }

    fn pause(&mut self) -> ClipResult<()> {
        self.calls.lock().unwrap().push("pause".to_string());
        Ok(())
    }

    fn stop(&mut self) -> ClipResult<()> {
        self.calls.lock().unwrap().push("stop".to_string());
        if let Some(mut writer) = self.writer.take() {
            let frames = (f64::from(self.sample_rate) * SECONDS_PER_RECORD) as u32 * self.records;
            for _ in 0..frames {
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        Ok(())
    }
}

/// File accessor with switchable failures on top of the real filesystem.
#[derive(Default)]
pub(crate) struct FlakyFiles {
    pub(crate) fail_remove: bool,
    /// Entries whose file name contains "unreadable" fail to stat.
    pub(crate) fail_entries: bool,
    /// The directory itself cannot be read.
    pub(crate) fail_listing: bool,
}

impl FileAccessor for FlakyFiles {
    fn exists(&self, path: &Path) -> bool {
        SystemFileAccessor.exists(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        SystemFileAccessor.remove(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        SystemFileAccessor.create_dir_all(path)
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<io::Result<ListedFile>>> {
        if self.fail_listing {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "no access"));
        }
        let entries = SystemFileAccessor.list(dir)?;
        if !self.fail_entries {
            return Ok(entries);
        }
        Ok(entries
            .into_iter()
            .map(|entry| match entry {
                Ok(listed)
                    if listed
                        .path
                        .file_name()
                        .is_some_and(|n| n.to_string_lossy().contains("unreadable")) =>
                {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "stat failed"))
                }
                other => other,
            })
            .collect())
    }
}

/// Prober that counts how often it is asked.
pub(crate) struct CountingProber {
    pub(crate) probes: Mutex<u32>,
}

impl CountingProber {
    pub(crate) fn new() -> Self {
        Self {
            probes: Mutex::new(0),
        }
    }

    pub(crate) fn count(&self) -> u32 {
        *self.probes.lock().unwrap()
    }
}

impl MediaProber for CountingProber {
    fn probe(&self, path: &Path) -> ClipResult<f64> {
        *self.probes.lock().unwrap() += 1;
        WavProber.probe(path)
    }
}

pub(crate) fn wav_spec(config: &CaptureConfig) -> WavSpec {
    WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Write a silent mono WAV of `seconds` at 12kHz.
pub(crate) fn write_wav(path: &Path, seconds: f64) -> FileRef {
    let config = CaptureConfig::default();
    let mut writer = WavWriter::create(path, wav_spec(&config)).unwrap();
    let frames = (f64::from(config.sample_rate) * seconds) as u32;
    for _ in 0..frames {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
    FileRef::new(path)
}

/// Temp directory with the core wired to fakes.
pub(crate) struct Harness {
    pub(crate) dir: TempDir,
    pub(crate) clock: Arc<ManualClock>,
    pub(crate) device: Arc<FakeCaptureDevice>,
    pub(crate) names: Arc<NameOverrideStore>,
    pub(crate) prober: Arc<CountingProber>,
    pub(crate) files: Arc<dyn FileAccessor>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_device(FakeCaptureDevice::new())
    }

    pub(crate) fn with_device(device: FakeCaptureDevice) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let names = NameOverrideStore::load(&dir.path().join("names.toml")).unwrap();
        Self {
            dir,
            clock: Arc::new(ManualClock::new()),
            device: Arc::new(device),
            names: Arc::new(names),
            prober: Arc::new(CountingProber::new()),
            files: Arc::new(SystemFileAccessor),
        }
    }

    pub(crate) fn with_failing_removals(self) -> Self {
        self.with_files(FlakyFiles {
            fail_remove: true,
            ..FlakyFiles::default()
        })
    }

    pub(crate) fn with_files(mut self, files: FlakyFiles) -> Self {
        self.files = Arc::new(files);
        self
    }

    pub(crate) fn recordings_dir(&self) -> PathBuf {
        self.dir.path().join("recordings")
    }

    pub(crate) fn names_path(&self) -> PathBuf {
        self.dir.path().join("names.toml")
    }

    pub(crate) fn store(&self) -> Arc<RecordingStore> {
        Arc::new(RecordingStore::new(
            self.recordings_dir(),
            "wav",
            CaptureConfig::default(),
            Arc::clone(&self.device) as Arc<dyn CaptureDevice>,
            Arc::clone(&self.files),
        ))
    }

    pub(crate) fn session(&self) -> RecordingSession {
        RecordingSession::new(
            self.store(),
            Arc::clone(&self.names),
            Arc::clone(&self.clock) as Arc<dyn Clock>,
        )
    }

    pub(crate) fn catalog(&self) -> RecordingsCatalog {
        RecordingsCatalog::new(
            self.store(),
            Arc::clone(&self.names),
            Arc::clone(&self.prober) as Arc<dyn MediaProber>,
        )
    }

    pub(crate) fn clips(&self) -> VoiceClips {
        VoiceClips::new(
            VoiceClipsOptions::new(self.recordings_dir()),
            Arc::clone(&self.names),
            Collaborators {
                device: Arc::clone(&self.device) as Arc<dyn CaptureDevice>,
                prober: Arc::clone(&self.prober) as Arc<dyn MediaProber>,
                files: Arc::clone(&self.files),
                clock: Arc::clone(&self.clock) as Arc<dyn Clock>,
            },
        )
    }

    /// Write a recording directly into the recordings directory.
    pub(crate) fn existing_recording(&self, file_name: &str, seconds: f64) -> FileRef {
        std::fs::create_dir_all(self.recordings_dir()).unwrap();
        write_wav(&self.recordings_dir().join(file_name), seconds)
    }
}
