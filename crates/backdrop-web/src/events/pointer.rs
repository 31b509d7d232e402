use crate::dom;
use crate::{Page, SharedPage};
use backdrop_core::effects::EffectTarget;
use backdrop_core::pointer::{ElementRect, FocusKind, PointerSample};
use backdrop_core::style::ElementId;
use glam::Vec2;
use smallvec::SmallVec;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_pointermove(page: &SharedPage) {
    let page = page.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let Some(window) = web::window() else { return };
        let (vw, vh) = dom::viewport_size(&window);
        let sample = PointerSample {
            client: Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
            viewport: Vec2::new(vw as f32, vh as f32),
            time_ms: ev.time_stamp(),
        };
        let Ok(mut guard) = page.try_borrow_mut() else { return };
        let Page { backdrop, style, .. } = &mut *guard;

        // rects of the focused elements only; nothing else is measured
        let focus = *backdrop.pointer().focus();
        let rects: SmallVec<[(ElementId, Option<ElementRect>); 2]> =
            [FocusKind::Tilt, FocusKind::Magnetic]
                .into_iter()
                .filter_map(|kind| focus.get(kind))
                .map(|id| (id, style.element(id).and_then(|el| dom::element_rect(el))))
                .collect();
        let rect_of = |id: ElementId| {
            rects
                .iter()
                .find(|(e, _)| *e == id)
                .and_then(|(_, r)| *r)
        };
        backdrop.on_pointer_move(sample, style, &rect_of);
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Enter/leave listeners on every tilt or magnetic element allowed to move.
pub fn wire_hover(page: &SharedPage, targets: &[EffectTarget], reduced_motion: bool) {
    for t in targets {
        if !t.motion_allowed(reduced_motion) {
            continue;
        }
        let Some(el) = page.borrow().style.element(t.id).cloned() else {
            continue;
        };
        if t.tilt {
            wire_focus(page, &el, t.id, FocusKind::Tilt);
        }
        if t.magnetic {
            wire_focus(page, &el, t.id, FocusKind::Magnetic);
        }
    }
}

fn wire_focus(page: &SharedPage, el: &web::HtmlElement, id: ElementId, kind: FocusKind) {
    let p = page.clone();
    let enter = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        if let Ok(mut g) = p.try_borrow_mut() {
            g.backdrop.on_enter(id, kind);
        }
    }) as Box<dyn FnMut(_)>);
    _ = el.add_event_listener_with_callback("pointerenter", enter.as_ref().unchecked_ref());
    enter.forget();

    let p = page.clone();
    let leave = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        if let Ok(mut g) = p.try_borrow_mut() {
            let Page { backdrop, style, .. } = &mut *g;
            backdrop.on_leave(id, kind, style);
        }
    }) as Box<dyn FnMut(_)>);
    _ = el.add_event_listener_with_callback("pointerleave", leave.as_ref().unchecked_ref());
    leave.forget();
}
