use crate::SharedPage;
use backdrop_core::lifecycle::FrameHandle;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A self-rescheduling `requestAnimationFrame` callback.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn request_frame(cb: &FrameCallback) -> Option<FrameHandle> {
    let window = web::window()?;
    let slot = cb.borrow();
    let closure = slot.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
        .map(FrameHandle)
}

/// Start the render loop. Every tick goes through the frame scheduler, which
/// decides whether to commit; the loop reschedules itself until teardown.
pub fn start_loop(page: &SharedPage) {
    let tick: FrameCallback = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let page_tick = page.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        page_tick
            .borrow_mut()
            .backdrop
            .on_frame(now, || request_frame(&tick_clone));
    }) as Box<dyn FnMut(f64)>));

    let handle = request_frame(&tick);
    page.borrow_mut().backdrop.handles_mut().frame = handle;
}
