use crate::dom;
use crate::host::WebScrollLayout;
use crate::SharedPage;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_resize(page: &SharedPage) {
    let p = page.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        let Some(window) = web::window() else { return };
        let Some(document) = window.document() else { return };
        let Ok(mut g) = p.try_borrow_mut() else { return };

        let (width, height) = if g.backdrop.visuals_enabled() {
            document
                .get_element_by_id(dom::CANVAS_ID)
                .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
                .map(|c| dom::sync_canvas_backing_size(&c))
                .unwrap_or((1, 1))
        } else {
            (1, 1)
        };
        let limit = dom::scrollable_height(&window, &document);
        g.backdrop
            .on_resize(width, height, limit, &mut WebScrollLayout);
        g.request_native_read();
    }) as Box<dyn FnMut(_)>);
    if let Some(w) = web::window() {
        _ = w.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

pub fn wire_visibility(page: &SharedPage) {
    let p = page.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        let Some(document) = dom::window_document() else { return };
        if let Ok(mut g) = p.try_borrow_mut() {
            g.backdrop.on_visibility(document.hidden());
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(doc) = dom::window_document() {
        _ = doc.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
    }
    closure.forget();
}

/// Navigation away tears everything down.
pub fn wire_pagehide(page: &SharedPage) {
    let p = page.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        match p.try_borrow_mut() {
            Ok(mut g) => g.teardown(),
            Err(_) => log::warn!("[teardown] page busy on pagehide"),
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(w) = web::window() {
        _ = w.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
