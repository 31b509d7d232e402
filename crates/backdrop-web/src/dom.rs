use backdrop_core::constants::MAX_DEVICE_PIXEL_RATIO;
use backdrop_core::pointer::ElementRect;
use web_sys as web;

pub const CANVAS_ID: &str = "backdrop-canvas";
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn prefers_reduced_motion(window: &web::Window) -> bool {
    matches!(window.match_media(REDUCED_MOTION_QUERY), Ok(Some(mq)) if mq.matches())
}

/// Viewport size in CSS pixels.
pub fn viewport_size(window: &web::Window) -> (f64, f64) {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (w, h)
}

pub fn scroll_offset(window: &web::Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Document height minus viewport height; how far the page can scroll.
pub fn scrollable_height(window: &web::Window, document: &web::Document) -> f64 {
    let doc_h = document
        .document_element()
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    let (_, view_h) = viewport_size(window);
    (doc_h - view_h).max(0.0)
}

/// Backing size = CSS size x min(devicePixelRatio, 1.5), at least 1x1.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio().min(MAX_DEVICE_PIXEL_RATIO);
        let rect = canvas.get_bounding_client_rect();
        let w_px = ((rect.width() * dpr) as u32).max(1);
        let h_px = ((rect.height() * dpr) as u32).max(1);
        if canvas.width() != w_px {
            canvas.set_width(w_px);
        }
        if canvas.height() != h_px {
            canvas.set_height(h_px);
        }
    }
    (canvas.width().max(1), canvas.height().max(1))
}

pub fn element_rect(el: &web::Element) -> Option<ElementRect> {
    if !el.is_connected() {
        return None;
    }
    let r = el.get_bounding_client_rect();
    Some(ElementRect {
        left: r.left() as f32,
        top: r.top() as f32,
        width: r.width() as f32,
        height: r.height() as f32,
    })
}
