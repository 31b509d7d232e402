//! Scroll synchronizer.
//!
//! Turns either damped-driver progress events or native scroll position into
//! one normalized scroll target, published to the render loop and to the
//! `--scroll` style variable. Style writes are de-duplicated on the rounded
//! value so DOM-write frequency is bounded independently of event frequency.

use crate::constants::{
    DAMPED_SCROLL_LERP, DAMPED_SCROLL_SETTLE_PX, DAMPED_SCROLL_WHEEL_MULTIPLIER,
    SCROLL_DECIMALS_SCALE,
};
use crate::state::InputTargets;
use crate::style::{StyleSink, VAR_SCROLL};

/// `clamp(offset / max(height, 1), 0, 1)`; non-finite input maps to 0.
#[inline]
pub fn normalized_progress(scroll_offset: f64, scrollable_height: f64) -> f32 {
    let p = scroll_offset / scrollable_height.max(1.0);
    if p.is_finite() {
        p.clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}

#[inline]
pub fn round_progress(progress: f32) -> f32 {
    (progress * SCROLL_DECIMALS_SCALE).round() / SCROLL_DECIMALS_SCALE
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollSource {
    /// Built-in damped driver, fed by wheel input.
    Damped,
    /// Native scroll listener, coalesced to one read per animation frame.
    Native,
}

impl ScrollSource {
    /// Exactly one source is ever active; the damped driver wins when usable.
    pub fn select(damped_available: bool, reduced_motion_requested: bool) -> Self {
        if damped_available && !reduced_motion_requested {
            ScrollSource::Damped
        } else {
            ScrollSource::Native
        }
    }
}

/// Anything that needs a layout recalculation when scroll geometry changes.
pub trait ScrollLayout {
    fn refresh(&mut self);
}

pub struct ScrollSynchronizer {
    source: ScrollSource,
    last_published: Option<f32>,
}

impl ScrollSynchronizer {
    pub fn new(source: ScrollSource) -> Self {
        Self {
            source,
            last_published: None,
        }
    }

    pub fn source(&self) -> ScrollSource {
        self.source
    }

    pub fn last_published(&self) -> Option<f32> {
        self.last_published
    }

    /// Initial layout recalculation, once.
    pub fn setup(&mut self, layout: &mut dyn ScrollLayout) {
        log::debug!("[scroll] source={:?}", self.source);
        layout.refresh();
    }

    pub fn on_resize(&mut self, layout: &mut dyn ScrollLayout) {
        layout.refresh();
    }

    /// Publish a progress value coming from `from`. Emissions from the
    /// inactive source are ignored. Returns true when the style variable was
    /// written.
    pub fn emit(
        &mut self,
        from: ScrollSource,
        progress: f32,
        targets: &mut InputTargets,
        sink: &mut dyn StyleSink,
    ) -> bool {
        if from != self.source {
            return false;
        }
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        targets.set_scroll(progress);
        let rounded = round_progress(progress);
        if self.last_published == Some(rounded) {
            return false;
        }
        self.last_published = Some(rounded);
        sink.set_root_var(VAR_SCROLL, &format!("{:.4}", rounded));
        true
    }

    /// Native path: derive progress from raw offset and scrollable height.
    pub fn emit_native(
        &mut self,
        scroll_offset: f64,
        scrollable_height: f64,
        targets: &mut InputTargets,
        sink: &mut dyn StyleSink,
    ) -> bool {
        let progress = normalized_progress(scroll_offset, scrollable_height);
        self.emit(ScrollSource::Native, progress, targets, sink)
    }
}

/// Request coalescing for native scroll reads: many events, one read per frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCoalescer {
    pending: bool,
}

impl FrameCoalescer {
    /// True when the caller should schedule a frame; false when one is pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            false
        } else {
            self.pending = true;
            true
        }
    }

    /// Called from the scheduled frame. True if a read was requested.
    pub fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEmission {
    pub progress: f32,
    pub offset: f64,
}

/// Damped smooth-scroll driver. Wheel input moves a target offset; each
/// driver tick moves the applied offset part of the way there.
#[derive(Clone, Debug)]
pub struct DampedScroll {
    current: f64,
    target: f64,
    limit: f64,
    lerp: f64,
}

impl DampedScroll {
    pub fn new(offset: f64, limit: f64) -> Self {
        let limit = limit.max(0.0);
        let offset = offset.clamp(0.0, limit);
        Self {
            current: offset,
            target: offset,
            limit,
            lerp: DAMPED_SCROLL_LERP,
        }
    }

    pub fn offset(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn push_wheel(&mut self, delta_y: f64) {
        if delta_y.is_finite() {
            self.target =
                (self.target + delta_y * DAMPED_SCROLL_WHEEL_MULTIPLIER).clamp(0.0, self.limit);
        }
    }

    /// Jump both offsets, e.g. after a native scroll the driver did not cause.
    pub fn sync_to(&mut self, offset: f64) {
        let o = offset.clamp(0.0, self.limit);
        self.current = o;
        self.target = o;
    }

    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        self.target = self.target.clamp(0.0, self.limit);
        self.current = self.current.clamp(0.0, self.limit);
    }

    /// Advance one driver tick. Emits only when the applied offset moved.
    pub fn step(&mut self) -> Option<ScrollEmission> {
        let gap = self.target - self.current;
        if gap == 0.0 {
            return None;
        }
        if gap.abs() <= DAMPED_SCROLL_SETTLE_PX {
            self.current = self.target;
        } else {
            self.current += gap * self.lerp;
        }
        Some(self.emission())
    }

    pub fn emission(&self) -> ScrollEmission {
        ScrollEmission {
            progress: normalized_progress(self.current, self.limit),
            offset: self.current,
        }
    }

    /// Drop any in-flight motion.
    pub fn reset(&mut self) {
        self.target = self.current;
    }
}
