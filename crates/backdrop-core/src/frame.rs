//! Frame scheduler.
//!
//! Called once per host animation callback. Decides whether this tick
//! commits a frame, advances the smoothed pointer and scroll state, writes the
//! derived camera/uniform/transform values into the scene and issues the draw.
//! No tick assumes the previous one ran.

use crate::config::LoopConfig;
use crate::constants::*;
use crate::error::DrawError;
use crate::scene::{SceneBackend, SceneGraph, SceneObjects};
use crate::state::{InputTargets, RenderState};
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Visuals disabled or scene gone; nothing to do.
    Inactive,
    /// Page hidden; all animation paused.
    Hidden,
    /// Inside the frame budget.
    Throttled,
    /// Frame committed and drawn.
    Committed,
}

/// 1 below [`FADE_START`], then linear to 0 over [`FADE_WIDTH`], floored at 0.
#[inline]
pub fn fade_factor(scroll: f32) -> f32 {
    if scroll <= FADE_START {
        1.0
    } else {
        (1.0 - (scroll - FADE_START) / FADE_WIDTH).max(0.0)
    }
}

#[inline]
pub fn emissive_intensity(base: f32, elapsed_sec: f32, phase: f32, scroll: f32) -> f32 {
    base + EMISSIVE_PULSE_AMPLITUDE * (elapsed_sec * EMISSIVE_PULSE_RATE + phase).sin()
        + EMISSIVE_SCROLL_GAIN * scroll
}

/// Write every per-frame value derived from elapsed time and smoothed state.
pub fn apply_frame(scene: &mut SceneObjects, state: &RenderState, elapsed_sec: f32) {
    let p = state.pointer_current;
    let s = state.scroll_current;
    let t = elapsed_sec;

    scene.camera.eye = Vec3::new(p.x * CAMERA_POINTER_X, p.y * CAMERA_POINTER_Y, CAMERA_Z);
    scene.camera.target = Vec3::ZERO;

    scene.backdrop.time = t;
    scene.backdrop.scroll = s;

    let fade = fade_factor(s);
    for solid in scene.solids.iter_mut() {
        solid.rotation = solid.spin * t + Vec3::splat(solid.phase);
        let m = &mut solid.material;
        m.emissive_intensity = emissive_intensity(m.base_emissive_intensity, t, solid.phase, s);
        m.opacity = m.base_opacity * fade;
    }

    scene.particles.rotation = Vec3::new(t * 0.01, t * 0.02, 0.0);

    scene.group.position = Vec3::new(0.0, s * GROUP_SCROLL_LIFT, 0.0);
    scene.group.rotation = Vec3::new(s * 0.2, s * GROUP_SCROLL_TURN, 0.0);
}

pub struct FrameScheduler {
    config: LoopConfig,
    state: RenderState,
    start_ms: Option<f64>,
    committed: u64,
}

impl FrameScheduler {
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            state: RenderState::default(),
            start_ms: None,
            committed: 0,
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn committed_frames(&self) -> u64 {
        self.committed
    }

    /// Visibility signal: hidden pages pause all frame work.
    pub fn set_running(&mut self, running: bool) {
        if self.state.running != running {
            log::debug!("[frame] running={}", running);
        }
        self.state.running = running;
    }

    /// One host animation callback at `now_ms` (monotonic host clock).
    /// Elapsed scene time is measured from the first committed frame.
    pub fn tick<B: SceneBackend>(
        &mut self,
        now_ms: f64,
        targets: &InputTargets,
        scene: Option<&mut SceneGraph<B>>,
    ) -> TickOutcome {
        let Some(scene) = scene.filter(|s| !s.is_disposed()) else {
            return TickOutcome::Inactive;
        };
        if !self.state.running {
            return TickOutcome::Hidden;
        }
        if let Some(last) = self.state.last_frame_ms {
            if now_ms - last < self.config.frame_interval_ms {
                return TickOutcome::Throttled;
            }
        }
        self.state.last_frame_ms = Some(now_ms);
        let start = *self.start_ms.get_or_insert(now_ms);
        let elapsed_sec = ((now_ms - start) / 1000.0) as f32;

        let sm = self.config.smoothing;
        self.state.advance(targets, sm.pointer, sm.scroll);
        apply_frame(scene.objects_mut(), &self.state, elapsed_sec);
        self.committed += 1;

        match scene.draw() {
            Ok(()) => {}
            Err(DrawError::SurfaceLost) => log::info!("[frame] surface lost; skipped draw"),
            Err(e) => log::warn!("[frame] draw error: {}", e),
        }
        TickOutcome::Committed
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(LoopConfig::default())
    }
}
