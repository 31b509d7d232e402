//! Loop state shared between input handlers and the frame scheduler.
//!
//! Input handlers only ever write [`InputTargets`]; the scheduler owns
//! [`RenderState`] and is the single writer of every smoothed value.

use glam::{Mat4, Vec2, Vec3};

/// Latest targets published by the pointer router and scroll synchronizer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputTargets {
    /// Device-independent pointer position, components in [-1, 1].
    pub pointer: Vec2,
    /// Normalized document scroll progress in [0, 1].
    pub scroll: f32,
}

impl InputTargets {
    pub fn set_pointer(&mut self, p: Vec2) {
        self.pointer = p.clamp(Vec2::splat(-1.0), Vec2::ONE);
    }

    pub fn set_scroll(&mut self, s: f32) {
        self.scroll = if s.is_finite() { s.clamp(0.0, 1.0) } else { 0.0 };
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub pointer_current: Vec2,
    pub pointer_target: Vec2,
    pub scroll_current: f32,
    pub scroll_target: f32,
    pub running: bool,
    /// Host clock time (ms) of the last committed frame.
    pub last_frame_ms: Option<f64>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            pointer_current: Vec2::ZERO,
            pointer_target: Vec2::ZERO,
            scroll_current: 0.0,
            scroll_target: 0.0,
            running: true,
            last_frame_ms: None,
        }
    }
}

impl RenderState {
    /// Latch the current targets and advance both smoothed values one frame.
    pub fn advance(&mut self, targets: &InputTargets, pointer_factor: f32, scroll_factor: f32) {
        self.pointer_target = targets.pointer;
        self.scroll_target = targets.scroll;
        self.pointer_current = damp_vec2(self.pointer_current, self.pointer_target, pointer_factor);
        self.scroll_current = damp(self.scroll_current, self.scroll_target, scroll_factor);
    }
}

/// One step of exponential smoothing. `factor` is clamped to [0, 1] so the
/// result always lies between `current` and `target`.
#[inline]
pub fn damp(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor.clamp(0.0, 1.0)
}

#[inline]
pub fn damp_vec2(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    Vec2::new(
        damp(current.x, target.x, factor),
        damp(current.y, target.y, factor),
    )
}

/// Right-handed perspective camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Recompute the aspect ratio for a new surface size. Zero sizes are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}
