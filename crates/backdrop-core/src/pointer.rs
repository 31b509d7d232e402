//! Pointer interaction router.
//!
//! Normalizes raw pointer movement into the smoothing target, keeps the root
//! cursor variables current on every event, and forwards element-local
//! offsets to whichever element currently holds tilt or magnetic focus.

use crate::constants::{
    MAGNETIC_STRENGTH_PX, POINTER_THROTTLE_MS, TILT_MAX_X_DEG, TILT_MAX_Y_DEG,
};
use crate::state::InputTargets;
use crate::style::{
    deg, percent, px, ElementId, StyleSink, VAR_GLOW_X, VAR_GLOW_Y, VAR_MAGNET_X, VAR_MAGNET_Y,
    VAR_POINTER_X, VAR_POINTER_X_PX, VAR_POINTER_Y, VAR_POINTER_Y_PX, VAR_TILT_X, VAR_TILT_Y,
};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusKind {
    Tilt,
    Magnetic,
}

/// Bounding box of an element in client (viewport) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementRect {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltStyle {
    pub rotate_x_deg: f32,
    pub rotate_y_deg: f32,
    pub glow_x_pct: f32,
    pub glow_y_pct: f32,
}

impl TiltStyle {
    pub const NEUTRAL: TiltStyle = TiltStyle {
        rotate_x_deg: 0.0,
        rotate_y_deg: 0.0,
        glow_x_pct: 50.0,
        glow_y_pct: 50.0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagnetOffset {
    pub x_px: f32,
    pub y_px: f32,
}

impl MagnetOffset {
    pub const NEUTRAL: MagnetOffset = MagnetOffset { x_px: 0.0, y_px: 0.0 };
}

/// `x = (cx / w) * 2 - 1`, `y = -(cy / h) * 2 + 1`, clamped to [-1, 1].
#[inline]
pub fn normalize_pointer(client: Vec2, viewport: Vec2) -> Vec2 {
    let w = viewport.x.max(1.0);
    let h = viewport.y.max(1.0);
    let x = (client.x / w) * 2.0 - 1.0;
    let y = -(client.y / h) * 2.0 + 1.0;
    Vec2::new(x, y).clamp(Vec2::splat(-1.0), Vec2::ONE)
}

/// Element-local position, 0..1 across the bounding box.
#[inline]
pub fn local_coords(client: Vec2, rect: &ElementRect) -> Vec2 {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return Vec2::splat(0.5);
    }
    Vec2::new(
        (client.x - rect.left) / rect.width,
        (client.y - rect.top) / rect.height,
    )
    .clamp(Vec2::ZERO, Vec2::ONE)
}

// `+ 0.0` folds negative zero so the element center writes "0.00deg".
#[inline]
pub fn tilt_for(local: Vec2) -> TiltStyle {
    let dx = local.x - 0.5;
    let dy = local.y - 0.5;
    TiltStyle {
        rotate_x_deg: -dy * 2.0 * TILT_MAX_X_DEG + 0.0,
        rotate_y_deg: dx * 2.0 * TILT_MAX_Y_DEG + 0.0,
        glow_x_pct: local.x * 100.0,
        glow_y_pct: local.y * 100.0,
    }
}

#[inline]
pub fn magnet_for(local: Vec2) -> MagnetOffset {
    MagnetOffset {
        x_px: (local.x - 0.5) * 2.0 * MAGNETIC_STRENGTH_PX + 0.0,
        y_px: (local.y - 0.5) * 2.0 * MAGNETIC_STRENGTH_PX + 0.0,
    }
}

fn write_tilt(sink: &mut dyn StyleSink, id: ElementId, t: &TiltStyle) {
    sink.set_element_var(id, VAR_TILT_X, &deg(t.rotate_x_deg));
    sink.set_element_var(id, VAR_TILT_Y, &deg(t.rotate_y_deg));
    sink.set_element_var(id, VAR_GLOW_X, &percent(t.glow_x_pct));
    sink.set_element_var(id, VAR_GLOW_Y, &percent(t.glow_y_pct));
}

fn write_magnet(sink: &mut dyn StyleSink, id: ElementId, m: &MagnetOffset) {
    sink.set_element_var(id, VAR_MAGNET_X, &px(m.x_px));
    sink.set_element_var(id, VAR_MAGNET_Y, &px(m.y_px));
}

/// At most one tilt and one magnetic element, tracked by identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverFocus {
    tilt: Option<ElementId>,
    magnetic: Option<ElementId>,
}

impl HoverFocus {
    pub fn get(&self, kind: FocusKind) -> Option<ElementId> {
        match kind {
            FocusKind::Tilt => self.tilt,
            FocusKind::Magnetic => self.magnetic,
        }
    }

    fn slot_mut(&mut self, kind: FocusKind) -> &mut Option<ElementId> {
        match kind {
            FocusKind::Tilt => &mut self.tilt,
            FocusKind::Magnetic => &mut self.magnetic,
        }
    }

    /// Drop any focus held by `id`, e.g. once it leaves the document.
    pub fn forget(&mut self, id: ElementId) {
        if self.tilt == Some(id) {
            self.tilt = None;
        }
        if self.magnetic == Some(id) {
            self.magnetic = None;
        }
    }

    pub fn clear(&mut self) {
        self.tilt = None;
        self.magnetic = None;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub client: Vec2,
    pub viewport: Vec2,
    /// Wall-clock time in milliseconds.
    pub time_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// Became the new pointer target.
    Accepted(Vec2),
    /// Inside the throttle window; dropped.
    Throttled,
}

pub struct PointerRouter {
    throttle_ms: f64,
    last_accepted_ms: Option<f64>,
    focus: HoverFocus,
}

impl Default for PointerRouter {
    fn default() -> Self {
        Self::new(POINTER_THROTTLE_MS)
    }
}

impl PointerRouter {
    pub fn new(throttle_ms: f64) -> Self {
        Self {
            throttle_ms,
            last_accepted_ms: None,
            focus: HoverFocus::default(),
        }
    }

    pub fn focus(&self) -> &HoverFocus {
        &self.focus
    }

    pub fn on_move(
        &mut self,
        sample: PointerSample,
        targets: &mut InputTargets,
        sink: &mut dyn StyleSink,
        rect_of: &dyn Fn(ElementId) -> Option<ElementRect>,
    ) -> MoveOutcome {
        let ndc = normalize_pointer(sample.client, sample.viewport);
        // cursor-following variables are not throttled
        sink.set_root_var(VAR_POINTER_X_PX, &px(sample.client.x));
        sink.set_root_var(VAR_POINTER_Y_PX, &px(sample.client.y));
        sink.set_root_var(VAR_POINTER_X, &format!("{:.4}", ndc.x));
        sink.set_root_var(VAR_POINTER_Y, &format!("{:.4}", ndc.y));

        if let Some(last) = self.last_accepted_ms {
            if sample.time_ms - last < self.throttle_ms {
                return MoveOutcome::Throttled;
            }
        }
        self.last_accepted_ms = Some(sample.time_ms);
        targets.set_pointer(ndc);

        if let Some(id) = self.focus.tilt {
            match rect_of(id) {
                Some(rect) => {
                    let t = tilt_for(local_coords(sample.client, &rect));
                    write_tilt(sink, id, &t);
                }
                None => self.focus.forget(id),
            }
        }
        if let Some(id) = self.focus.magnetic {
            match rect_of(id) {
                Some(rect) => {
                    let m = magnet_for(local_coords(sample.client, &rect));
                    write_magnet(sink, id, &m);
                }
                None => self.focus.forget(id),
            }
        }
        MoveOutcome::Accepted(ndc)
    }

    pub fn on_enter(&mut self, id: ElementId, kind: FocusKind) {
        *self.focus.slot_mut(kind) = Some(id);
    }

    /// Reset the leaving element to neutral unconditionally; clear focus only
    /// if that element still holds it.
    pub fn on_leave(&mut self, id: ElementId, kind: FocusKind, sink: &mut dyn StyleSink) {
        match kind {
            FocusKind::Tilt => write_tilt(sink, id, &TiltStyle::NEUTRAL),
            FocusKind::Magnetic => write_magnet(sink, id, &MagnetOffset::NEUTRAL),
        }
        let slot = self.focus.slot_mut(kind);
        if *slot == Some(id) {
            *slot = None;
        }
    }

    pub fn forget(&mut self, id: ElementId) {
        self.focus.forget(id);
    }
}
