//! One page's interaction loop: the gate decision, the input routers, the
//! frame scheduler and the lifecycle owner, wired together.
//!
//! The host calls into [`Backdrop`] from its event and animation callbacks.
//! Host-side scheduling is passed in as closures returning the new handle so
//! every handle lands in [`LoopHandles`] and nowhere else.

use crate::capability::Capabilities;
use crate::config::LoopConfig;
use crate::effects::PageConfig;
use crate::error::{BuildError, Degradation};
use crate::frame::{FrameScheduler, TickOutcome};
use crate::lifecycle::{FrameHandle, HostScheduler, Lifecycle, LoopHandles};
use crate::pointer::{ElementRect, FocusKind, MoveOutcome, PointerRouter, PointerSample};
use crate::scene::{SceneBackend, SceneGraph};
use crate::scroll::{
    DampedScroll, FrameCoalescer, ScrollEmission, ScrollLayout, ScrollSource, ScrollSynchronizer,
};
use crate::state::InputTargets;
use crate::style::{ElementId, StyleSink};

pub struct Backdrop<B: SceneBackend> {
    capabilities: Capabilities,
    targets: InputTargets,
    /// `None` when the gate denied visuals, the build failed, or after teardown.
    scheduler: Option<FrameScheduler>,
    pointer: PointerRouter,
    scroll: ScrollSynchronizer,
    damped: Option<DampedScroll>,
    native_reads: FrameCoalescer,
    lifecycle: Lifecycle<B>,
}

impl<B: SceneBackend> Backdrop<B> {
    /// `scroll_offset` and `scroll_limit` seed the damped driver when the
    /// page opts into it.
    pub fn new(
        capabilities: Capabilities,
        page: PageConfig,
        config: LoopConfig,
        scroll_offset: f64,
        scroll_limit: f64,
    ) -> Self {
        let source = ScrollSource::select(page.smooth_scroll, capabilities.reduced_motion_requested);
        let damped = match source {
            ScrollSource::Damped => Some(DampedScroll::new(scroll_offset, scroll_limit)),
            ScrollSource::Native => None,
        };
        let scheduler = match capabilities.deny_reason() {
            None => Some(FrameScheduler::new(config)),
            Some(reason) => {
                log::info!("[backdrop] {}", Degradation::CapabilityDenied(reason));
                None
            }
        };
        Self {
            capabilities,
            targets: InputTargets::default(),
            scheduler,
            pointer: PointerRouter::default(),
            scroll: ScrollSynchronizer::new(source),
            damped,
            native_reads: FrameCoalescer::default(),
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn visuals_enabled(&self) -> bool {
        self.scheduler.is_some()
    }

    pub fn targets(&self) -> &InputTargets {
        &self.targets
    }

    pub fn scheduler(&self) -> Option<&FrameScheduler> {
        self.scheduler.as_ref()
    }

    pub fn pointer(&self) -> &PointerRouter {
        &self.pointer
    }

    pub fn scroll(&self) -> &ScrollSynchronizer {
        &self.scroll
    }

    pub fn scroll_source(&self) -> ScrollSource {
        self.scroll.source()
    }

    pub fn damped(&self) -> Option<&DampedScroll> {
        self.damped.as_ref()
    }

    pub fn lifecycle(&self) -> &Lifecycle<B> {
        &self.lifecycle
    }

    pub fn scene(&self) -> Option<&SceneGraph<B>> {
        self.lifecycle.scene()
    }

    pub fn handles_mut(&mut self) -> &mut LoopHandles {
        &mut self.lifecycle.handles
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle.is_torn_down()
    }

    /// Run `build` only when the gate allowed visuals, then attach its result.
    pub fn build_scene(
        &mut self,
        build: impl FnOnce() -> Result<SceneGraph<B>, BuildError>,
    ) -> bool {
        if !self.visuals_enabled() {
            return false;
        }
        self.attach_scene(build())
    }

    /// Install a finished build. A failed build disables visuals for good.
    pub fn attach_scene(&mut self, built: Result<SceneGraph<B>, BuildError>) -> bool {
        match built {
            Ok(scene) if self.visuals_enabled() => {
                self.lifecycle.attach_scene(scene);
                self.lifecycle.scene().is_some()
            }
            Ok(mut scene) => {
                scene.dispose();
                false
            }
            Err(e) => {
                log::warn!("[backdrop] {}", Degradation::from(e));
                self.scheduler = None;
                false
            }
        }
    }

    /// Initial layout refresh; the damped driver also publishes its
    /// starting position.
    pub fn on_scroll_setup(&mut self, layout: &mut dyn ScrollLayout, sink: &mut dyn StyleSink) {
        self.scroll.setup(layout);
        if let Some(driver) = self.damped.as_ref() {
            let e = driver.emission();
            self.scroll
                .emit(ScrollSource::Damped, e.progress, &mut self.targets, sink);
        }
    }

    /// One animation callback of the frame loop. The pending handle is spent
    /// on entry; `reschedule` is only invoked while the loop is alive.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        reschedule: impl FnOnce() -> Option<FrameHandle>,
    ) -> TickOutcome {
        self.lifecycle.handles.frame = None;
        if self.lifecycle.is_torn_down() {
            log::debug!("[frame] {}", Degradation::StaleCallbackFired);
            return TickOutcome::Inactive;
        }
        let outcome = match self.scheduler.as_mut() {
            Some(s) => s.tick(now_ms, &self.targets, self.lifecycle.scene_mut()),
            None => TickOutcome::Inactive,
        };
        self.lifecycle.handles.frame = reschedule();
        outcome
    }

    pub fn on_visibility(&mut self, hidden: bool) {
        if let Some(s) = self.scheduler.as_mut() {
            s.set_running(!hidden);
        }
    }

    pub fn on_pointer_move(
        &mut self,
        sample: PointerSample,
        sink: &mut dyn StyleSink,
        rect_of: &dyn Fn(ElementId) -> Option<ElementRect>,
    ) -> Option<MoveOutcome> {
        if self.lifecycle.is_torn_down() {
            return None;
        }
        Some(self.pointer.on_move(sample, &mut self.targets, sink, rect_of))
    }

    pub fn on_enter(&mut self, id: ElementId, kind: FocusKind) {
        if !self.lifecycle.is_torn_down() {
            self.pointer.on_enter(id, kind);
        }
    }

    pub fn on_leave(&mut self, id: ElementId, kind: FocusKind, sink: &mut dyn StyleSink) {
        if !self.lifecycle.is_torn_down() {
            self.pointer.on_leave(id, kind, sink);
        }
    }

    /// Wheel input. Returns true when the damped driver consumed it; the host
    /// then suppresses native scrolling. Starts the driver loop if idle.
    pub fn on_wheel(
        &mut self,
        delta_y: f64,
        schedule: impl FnOnce() -> Option<FrameHandle>,
    ) -> bool {
        if self.lifecycle.is_torn_down() {
            return false;
        }
        let Some(driver) = self.damped.as_mut() else {
            return false;
        };
        driver.push_wheel(delta_y);
        if !driver.is_settled() && self.lifecycle.handles.scroll_driver.is_none() {
            self.lifecycle.handles.scroll_driver = schedule();
        }
        true
    }

    /// One tick of the damped driver's own loop. Returns the emission so the
    /// host can apply the offset to the document.
    pub fn on_driver_frame(
        &mut self,
        sink: &mut dyn StyleSink,
        reschedule: impl FnOnce() -> Option<FrameHandle>,
    ) -> Option<ScrollEmission> {
        self.lifecycle.handles.scroll_driver = None;
        if self.lifecycle.is_torn_down() {
            log::debug!("[scroll] {}", Degradation::StaleCallbackFired);
            return None;
        }
        let driver = self.damped.as_mut()?;
        let emission = driver.step();
        let settled = driver.is_settled();
        if let Some(e) = emission {
            self.scroll
                .emit(ScrollSource::Damped, e.progress, &mut self.targets, sink);
        }
        if !settled {
            self.lifecycle.handles.scroll_driver = reschedule();
        }
        emission
    }

    /// Scroll the damped driver did not cause (keyboard, scrollbar drag).
    /// Adopted only while the driver is at rest.
    pub fn on_external_scroll(&mut self, offset: f64, sink: &mut dyn StyleSink) -> bool {
        if self.lifecycle.is_torn_down() {
            return false;
        }
        let Some(driver) = self.damped.as_mut() else {
            return false;
        };
        if !driver.is_settled() || driver.offset() == offset {
            return false;
        }
        driver.sync_to(offset);
        let e = driver.emission();
        self.scroll
            .emit(ScrollSource::Damped, e.progress, &mut self.targets, sink)
    }

    /// Native scroll event: request one coalesced read per frame.
    pub fn on_native_scroll(&mut self, schedule: impl FnOnce() -> Option<FrameHandle>) {
        if self.lifecycle.is_torn_down() || self.scroll.source() != ScrollSource::Native {
            return;
        }
        if self.native_reads.request() {
            self.lifecycle.handles.scroll_read = schedule();
        }
    }

    /// The coalesced read: offset and scrollable height sampled once.
    pub fn on_native_read(
        &mut self,
        scroll_offset: f64,
        scrollable_height: f64,
        sink: &mut dyn StyleSink,
    ) -> bool {
        self.lifecycle.handles.scroll_read = None;
        if !self.native_reads.take() || self.lifecycle.is_torn_down() {
            return false;
        }
        self.scroll
            .emit_native(scroll_offset, scrollable_height, &mut self.targets, sink)
    }

    /// Viewport resize: surface size and aspect adapt, layout is refreshed,
    /// the damped driver learns the new limit. The gate is not re-run.
    pub fn on_resize(
        &mut self,
        width: u32,
        height: u32,
        scroll_limit: f64,
        layout: &mut dyn ScrollLayout,
    ) {
        if self.lifecycle.is_torn_down() {
            return;
        }
        if let Some(scene) = self.lifecycle.scene_mut() {
            scene.resize(width, height);
        }
        if let Some(driver) = self.damped.as_mut() {
            driver.set_limit(scroll_limit);
        }
        self.scroll.on_resize(layout);
    }

    /// Idempotent. Cancels every handle exactly once and releases the scene.
    pub fn teardown(&mut self, host: &mut dyn HostScheduler) -> bool {
        let damped = &mut self.damped;
        let released = self.lifecycle.teardown(host, || {
            if let Some(driver) = damped.as_mut() {
                driver.reset();
            }
        });
        if released {
            self.scheduler = None;
            self.native_reads = FrameCoalescer::default();
        }
        released
    }
}
