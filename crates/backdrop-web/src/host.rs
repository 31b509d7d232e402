use backdrop_core::lifecycle::{FrameHandle, HostScheduler, ObserverHandle, TimerHandle};
use backdrop_core::scroll::ScrollLayout;
use fnv::FnvHashMap;
use web_sys as web;

/// Event other scroll-linked effects listen for to recompute their layout.
pub const LAYOUT_REFRESH_EVENT: &str = "backdrop:layout-refresh";

/// Browser-side cancellation primitives. Observers are kept here so the
/// lifecycle owner only ever holds plain handles.
#[derive(Default)]
pub struct WebHost {
    observers: FnvHashMap<ObserverHandle, web::IntersectionObserver>,
    next_observer: u32,
}

impl WebHost {
    pub fn adopt_observer(&mut self, observer: web::IntersectionObserver) -> ObserverHandle {
        self.next_observer += 1;
        let handle = ObserverHandle(self.next_observer);
        self.observers.insert(handle, observer);
        handle
    }
}

impl HostScheduler for WebHost {
    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(handle.0);
        }
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        if let Some(w) = web::window() {
            w.clear_interval_with_handle(handle.0);
        }
    }

    fn disconnect(&mut self, handle: ObserverHandle) {
        if let Some(obs) = self.observers.remove(&handle) {
            obs.disconnect();
        }
    }
}

/// Fires [`LAYOUT_REFRESH_EVENT`] on the window.
pub struct WebScrollLayout;

impl ScrollLayout for WebScrollLayout {
    fn refresh(&mut self) {
        let Some(w) = web::window() else { return };
        if let Ok(ev) = web::Event::new(LAYOUT_REFRESH_EVENT) {
            _ = w.dispatch_event(&ev);
        }
    }
}
