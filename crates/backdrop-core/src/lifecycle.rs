//! Resource lifecycle: every recurring callback, timer and observer handle
//! lives in one [`LoopHandles`] owned by the [`Lifecycle`]. Cancellation takes
//! the handle out of its slot, so a handle can never be cancelled twice.

use crate::error::Degradation;
use crate::scene::{SceneBackend, SceneGraph};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u32);

/// Cancellation primitives of the host.
pub trait HostScheduler {
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn clear_timer(&mut self, handle: TimerHandle);
    fn disconnect(&mut self, handle: ObserverHandle);
}

#[derive(Debug, Default)]
pub struct LoopHandles {
    /// Pending frame-scheduler tick.
    pub frame: Option<FrameHandle>,
    /// Pending damped-scroll driver tick.
    pub scroll_driver: Option<FrameHandle>,
    /// Pending coalesced native scroll read.
    pub scroll_read: Option<FrameHandle>,
    pub timers: SmallVec<[TimerHandle; 2]>,
    pub observers: SmallVec<[ObserverHandle; 2]>,
}

impl LoopHandles {
    pub fn cancel_frame(&mut self, host: &mut dyn HostScheduler) {
        if let Some(h) = self.frame.take() {
            host.cancel_frame(h);
        }
    }

    pub fn cancel_scroll_driver(&mut self, host: &mut dyn HostScheduler) {
        if let Some(h) = self.scroll_driver.take() {
            host.cancel_frame(h);
        }
        if let Some(h) = self.scroll_read.take() {
            host.cancel_frame(h);
        }
    }

    pub fn clear_timers(&mut self, host: &mut dyn HostScheduler) {
        for h in self.timers.drain(..) {
            host.clear_timer(h);
        }
    }

    pub fn disconnect_observers(&mut self, host: &mut dyn HostScheduler) {
        for h in self.observers.drain(..) {
            host.disconnect(h);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_none()
            && self.scroll_driver.is_none()
            && self.scroll_read.is_none()
            && self.timers.is_empty()
            && self.observers.is_empty()
    }
}

/// Owner of the scene and all loop handles for one page.
pub struct Lifecycle<B: SceneBackend> {
    pub handles: LoopHandles,
    scene: Option<SceneGraph<B>>,
    torn_down: bool,
}

impl<B: SceneBackend> Default for Lifecycle<B> {
    fn default() -> Self {
        Self {
            handles: LoopHandles::default(),
            scene: None,
            torn_down: false,
        }
    }
}

impl<B: SceneBackend> Lifecycle<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the built scene. Ignored after teardown.
    pub fn attach_scene(&mut self, scene: SceneGraph<B>) {
        if self.torn_down {
            log::info!("[lifecycle] scene arrived after teardown; releasing");
            let mut scene = scene;
            scene.dispose();
            return;
        }
        self.scene = Some(scene);
    }

    pub fn scene(&self) -> Option<&SceneGraph<B>> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut SceneGraph<B>> {
        self.scene.as_mut()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Idempotent: cancel every pending callback, clear timers, disconnect
    /// observers, reset driver state via `release_driver`, dispose GPU
    /// resources, and drop the scene so stale callbacks find nothing to do.
    pub fn teardown(
        &mut self,
        host: &mut dyn HostScheduler,
        release_driver: impl FnOnce(),
    ) -> bool {
        if self.torn_down {
            log::debug!("[lifecycle] {}", Degradation::ResourceAlreadyReleased);
            return false;
        }
        self.torn_down = true;
        self.handles.cancel_frame(host);
        self.handles.cancel_scroll_driver(host);
        self.handles.clear_timers(host);
        self.handles.disconnect_observers(host);
        release_driver();
        if let Some(mut scene) = self.scene.take() {
            scene.dispose();
        }
        log::info!("[lifecycle] torn down");
        true
    }
}
