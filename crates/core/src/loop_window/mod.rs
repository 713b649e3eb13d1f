//! Loop point alignment.
//!
//! Loop boundaries handed to the player must land on compression block
//! boundaries of the encoded stream. Requested points are rounded down to the
//! nearest block; requests that fall outside the track are replaced by a loop
//! over the whole track.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Loop boundaries in decoded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoopWindow {
    pub start_sample: u64,
    pub end_sample: u64,
}

impl LoopWindow {
    pub fn new(start_sample: u64, end_sample: u64) -> Self {
        Self {
            start_sample,
            end_sample,
        }
    }

    /// Loop over the whole track, ending on the last full block.
    pub fn full_track(total_samples: u64, block_size: u32) -> Self {
        Self::new(0, align_to_block(total_samples, block_size))
    }
}

/// Why a loop window was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoopRejection {
    #[error("Loop start sample exceeds total samples: {start} > {total}")]
    StartBeyondTrack { start: u64, total: u64 },

    #[error("Loop end sample exceeds total samples: {end} > {total}")]
    EndBeyondTrack { end: u64, total: u64 },
}

/// Rounds `sample` down to a multiple of `block_size`. A block size of 0
/// leaves the sample unchanged.
pub fn align_to_block(sample: u64, block_size: u32) -> u64 {
    if block_size == 0 {
        return sample;
    }

    let adjustment = sample % u64::from(block_size);
    if adjustment != 0 {
        debug!(
            "Aligning: {} to {} (-{})",
            sample,
            sample - adjustment,
            adjustment
        );
    }
    sample - adjustment
}

/// Checks that both boundaries lie within the track.
pub fn check_loop_window(total_samples: u64, window: LoopWindow) -> Result<(), LoopRejection> {
    if window.start_sample > total_samples {
        return Err(LoopRejection::StartBeyondTrack {
            start: window.start_sample,
            total: total_samples,
        });
    }
    if window.end_sample > total_samples {
        return Err(LoopRejection::EndBeyondTrack {
            end: window.end_sample,
            total: total_samples,
        });
    }
    Ok(())
}

/// Derives the loop window to record for a track.
///
/// A request of `(0, 0)` means "loop the whole track". Otherwise both bounds
/// are aligned independently; if either aligned bound lies past
/// `total_samples` the request is dropped in favour of the full track.
pub fn resolve_loop_window(
    total_samples: u64,
    requested_start: u64,
    requested_end: u64,
    block_size: u32,
) -> LoopWindow {
    if requested_start == 0 && requested_end == 0 {
        return LoopWindow::full_track(total_samples, block_size);
    }

    let window = LoopWindow::new(
        align_to_block(requested_start, block_size),
        align_to_block(requested_end, block_size),
    );

    match check_loop_window(total_samples, window) {
        Ok(()) => window,
        Err(rejection) => {
            warn!("{}; defaulting to full song loop", rejection);
            LoopWindow::full_track(total_samples, block_size)
        }
    }
}
