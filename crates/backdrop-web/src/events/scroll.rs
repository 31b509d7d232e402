use crate::dom;
use crate::frame::{self, FrameCallback};
use crate::{Page, SharedPage};
use backdrop_core::scroll::ScrollSource;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const LINE_HEIGHT_PX: f64 = 16.0;

/// Exactly one scroll source is wired: the damped driver or native scroll.
pub fn wire(page: &SharedPage) {
    let source = page.borrow().backdrop.scroll_source();
    match source {
        ScrollSource::Native => wire_native(page),
        ScrollSource::Damped => wire_damped(page),
    }
}

fn wire_native(page: &SharedPage) {
    let read: FrameCallback = Rc::new(RefCell::new(None));
    let p = page.clone();
    *read.borrow_mut() = Some(Closure::wrap(Box::new(move |_now: f64| {
        let Some(window) = web::window() else { return };
        let Some(document) = window.document() else { return };
        let offset = dom::scroll_offset(&window);
        let height = dom::scrollable_height(&window, &document);
        let mut guard = p.borrow_mut();
        let Page { backdrop, style, .. } = &mut *guard;
        backdrop.on_native_read(offset, height, style);
    }) as Box<dyn FnMut(f64)>));
    page.borrow_mut().native_read = Some(read);

    let p = page.clone();
    let on_scroll = Closure::wrap(Box::new(move |_ev: web::Event| {
        if let Ok(mut g) = p.try_borrow_mut() {
            g.request_native_read();
        }
    }) as Box<dyn FnMut(_)>);
    add_listener("scroll", &on_scroll, true);
    on_scroll.forget();
}

fn wire_damped(page: &SharedPage) {
    let driver: FrameCallback = Rc::new(RefCell::new(None));
    let driver_clone = driver.clone();
    let p = page.clone();
    *driver.borrow_mut() = Some(Closure::wrap(Box::new(move |_now: f64| {
        let emission = {
            let mut guard = p.borrow_mut();
            let Page { backdrop, style, .. } = &mut *guard;
            backdrop.on_driver_frame(style, || frame::request_frame(&driver_clone))
        };
        // scroll_to fires a scroll event synchronously in some engines; the
        // page borrow must be released first
        if let (Some(e), Some(window)) = (emission, web::window()) {
            let opts = web::ScrollToOptions::new();
            opts.set_top(e.offset);
            opts.set_behavior(web::ScrollBehavior::Instant);
            window.scroll_to_with_scroll_to_options(&opts);
        }
    }) as Box<dyn FnMut(f64)>));

    let p = page.clone();
    let on_wheel = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let Ok(mut g) = p.try_borrow_mut() else { return };
        let delta = wheel_delta_px(&ev);
        if g.backdrop.on_wheel(delta, || frame::request_frame(&driver)) {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    add_listener("wheel", &on_wheel, false);
    on_wheel.forget();

    // keyboard and scrollbar scrolling bypass the wheel
    let p = page.clone();
    let on_scroll = Closure::wrap(Box::new(move |_ev: web::Event| {
        let Some(window) = web::window() else { return };
        let Ok(mut g) = p.try_borrow_mut() else { return };
        let Page { backdrop, style, .. } = &mut *g;
        backdrop.on_external_scroll(dom::scroll_offset(&window), style);
    }) as Box<dyn FnMut(_)>);
    add_listener("scroll", &on_scroll, true);
    on_scroll.forget();
}

fn wheel_delta_px(ev: &web::WheelEvent) -> f64 {
    match ev.delta_mode() {
        web::WheelEvent::DOM_DELTA_LINE => ev.delta_y() * LINE_HEIGHT_PX,
        web::WheelEvent::DOM_DELTA_PAGE => {
            let page_h = web::window()
                .map(|w| dom::viewport_size(&w).1)
                .unwrap_or(0.0);
            ev.delta_y() * page_h
        }
        _ => ev.delta_y(),
    }
}

fn add_listener<T: ?Sized>(event: &str, closure: &Closure<T>, passive: bool) {
    let Some(window) = web::window() else { return };
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(passive);
    _ = window.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &opts,
    );
}
