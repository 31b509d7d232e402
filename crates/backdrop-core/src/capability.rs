//! Capability gate, evaluated once at start-up.
//!
//! A later resize never re-runs the gate: a page that started narrow stays
//! without visuals, and a running instance only adapts its surface size.

use crate::constants::MIN_VIEWPORT_WIDTH_PX;
use crate::error::DenyReason;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub reduced_motion_requested: bool,
    pub viewport_too_narrow: bool,
}

impl Capabilities {
    /// Snapshot the ambient platform state. Pure; no side effects.
    pub fn probe(reduced_motion_requested: bool, viewport_width_px: f64) -> Self {
        Self {
            reduced_motion_requested,
            viewport_too_narrow: !(viewport_width_px >= MIN_VIEWPORT_WIDTH_PX),
        }
    }

    pub fn should_enable_visuals(&self) -> bool {
        self.deny_reason().is_none()
    }

    /// First reason the heavy subsystem is skipped, if any.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        if self.reduced_motion_requested {
            Some(DenyReason::ReducedMotion)
        } else if self.viewport_too_narrow {
            Some(DenyReason::NarrowViewport)
        } else {
            None
        }
    }
}

/// Convenience wrapper over [`Capabilities::probe`].
#[inline]
pub fn should_enable_visuals(reduced_motion_requested: bool, viewport_width_px: f64) -> bool {
    Capabilities::probe(reduced_motion_requested, viewport_width_px).should_enable_visuals()
}
