use crate::{ClipError, ClipResult};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Mono sample-rate converter used when the input device rate differs from
/// the configured recording rate.
pub struct Resampler {
    resampler: Fft<f32>,
    input_rate: u32,
    output_rate: u32,
}

impl Resampler {
    #[track_caller]
    #[instrument]
    pub fn new(input_rate: u32, output_rate: u32) -> ClipResult<Self> {
        let resampler = Fft::<f32>::new(
            input_rate as usize,
            output_rate as usize,
            CHUNK_SIZE,
            SUB_CHUNKS,
            1,
            FixedSync::Input,
        )
        .map_err(|e| ClipError::ResamplingError {
            reason: format!("Failed to create resampler: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(input_rate, output_rate, "Resampler initialized");

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
        })
    }

    /// Convert a whole mono buffer. The last partial chunk is zero padded and
    /// the result trimmed to the expected length.
    #[track_caller]
    #[instrument(skip(self, samples))]
    pub fn resample(&mut self, samples: &[f32]) -> ClipResult<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let expected_len =
            (samples.len() as f64 * self.output_rate as f64 / self.input_rate as f64) as usize;
        let mut output = Vec::with_capacity(expected_len);

        let mut input_chunk = vec![0.0f32; CHUNK_SIZE];
        let mut output_chunk = vec![0.0f32; self.resampler.output_frames_max()];

        for chunk in samples.chunks(CHUNK_SIZE) {
            input_chunk[..chunk.len()].copy_from_slice(chunk);
            input_chunk[chunk.len()..].fill(0.0);

            let input_adapter = InterleavedSlice::new(&input_chunk, 1, CHUNK_SIZE).map_err(|e| {
                ClipError::ResamplingError {
                    reason: format!("Failed to create input adapter: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

            let output_frames = output_chunk.len();
            let mut output_adapter = InterleavedSlice::new_mut(&mut output_chunk, 1, output_frames)
                .map_err(|e| ClipError::ResamplingError {
                    reason: format!("Failed to create output adapter: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let (_consumed, written) = self
                .resampler
                .process_into_buffer(&input_adapter, &mut output_adapter, None)
                .map_err(|e| ClipError::ResamplingError {
                    reason: format!("Resampling failed: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            output.extend_from_slice(&output_chunk[..written]);
        }

        output.truncate(expected_len);

        debug!(
            input_len = samples.len(),
            output_len = output.len(),
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Resampled capture"
        );

        Ok(output)
    }
}

/// Average interleaved frames down to a single channel.
pub fn downmix_to_mono(interleaved: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 | 1 => interleaved.to_vec(),
        n => interleaved
            .chunks(usize::from(n))
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect(),
    }
}
