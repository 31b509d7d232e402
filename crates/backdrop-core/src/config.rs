//! Loop configuration.
//!
//! The frame interval and the two smoothing factors form one tunable unit: the
//! factors are applied once per committed frame, so changing the cadence
//! without re-deriving them changes how fast the camera and fades appear to
//! follow input.

use crate::constants::{FRAME_INTERVAL_MS, POINTER_SMOOTHING, SCROLL_SMOOTHING};

/// Per-frame exponential smoothing factors for pointer and scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingPair {
    pub pointer: f32,
    pub scroll: f32,
}

impl Default for SmoothingPair {
    fn default() -> Self {
        Self {
            pointer: POINTER_SMOOTHING,
            scroll: SCROLL_SMOOTHING,
        }
    }
}

impl SmoothingPair {
    /// Re-derive both factors for a new frame interval so the remaining
    /// distance after one second of frames stays the same.
    pub fn retuned(self, from_interval_ms: f64, to_interval_ms: f64) -> Self {
        let ratio = (to_interval_ms / from_interval_ms.max(f64::EPSILON)) as f32;
        Self {
            pointer: retune_factor(self.pointer, ratio),
            scroll: retune_factor(self.scroll, ratio),
        }
    }
}

#[inline]
fn retune_factor(factor: f32, ratio: f32) -> f32 {
    (1.0 - (1.0 - factor.clamp(0.0, 1.0)).powf(ratio)).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopConfig {
    pub frame_interval_ms: f64,
    pub smoothing: SmoothingPair,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: FRAME_INTERVAL_MS,
            smoothing: SmoothingPair::default(),
        }
    }
}

impl LoopConfig {
    /// Same perceived motion at a different frame cadence.
    pub fn with_frame_interval(self, frame_interval_ms: f64) -> Self {
        Self {
            frame_interval_ms,
            smoothing: self
                .smoothing
                .retuned(self.frame_interval_ms, frame_interval_ms),
        }
    }
}
