//! Reveal-on-visibility and typewriter glue. State machines live in
//! `backdrop_core::effects`; this side owns the observer and the timer.

use crate::{Page, SharedPage};
use backdrop_core::effects::{
    EffectTarget, RevealTracker, Typewriter, ATTR_EFFECT_ID, EFFECT_SELECTOR, REVEAL_CLASS,
    REVEAL_THRESHOLD, TYPEWRITER_TICK_MS,
};
use backdrop_core::lifecycle::TimerHandle;
use backdrop_core::style::ElementId;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[derive(Default)]
pub struct EffectsState {
    typewriters: Vec<(ElementId, Typewriter)>,
    reveal: RevealTracker,
    last_tick: Option<instant::Instant>,
}

impl EffectsState {
    /// Stop every typewriter where it stands.
    pub fn cancel(&mut self) {
        for (_, tw) in self.typewriters.iter_mut() {
            tw.cancel();
        }
        self.last_tick = None;
    }

    fn all_typed(&self) -> bool {
        self.typewriters.iter().all(|(_, tw)| tw.is_done())
    }
}

/// Find every opted-in element, stamp it with its id and register it with
/// the style sink.
pub fn scan(document: &web::Document, style: &mut crate::style::CssVarSink) -> Vec<EffectTarget> {
    let Ok(nodes) = document.query_selector_all(EFFECT_SELECTOR) else {
        return Vec::new();
    };
    let mut targets = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(el) = nodes
            .item(i)
            .and_then(|n| n.dyn_into::<web::HtmlElement>().ok())
        else {
            continue;
        };
        let id = ElementId(i);
        _ = el.set_attribute(ATTR_EFFECT_ID, &i.to_string());
        targets.push(EffectTarget::from_attributes(
            id,
            |name| el.get_attribute(name),
            || el.text_content(),
        ));
        style.register(id, el);
    }
    log::debug!("[effects] {} targets", targets.len());
    targets
}

pub fn start(page: &SharedPage, targets: &[EffectTarget], reduced_motion: bool) -> anyhow::Result<()> {
    start_reveal(page, targets, reduced_motion)?;
    start_typewriters(page, targets, reduced_motion)?;
    Ok(())
}

fn effect_id(el: &web::Element) -> Option<ElementId> {
    el.get_attribute(ATTR_EFFECT_ID)
        .and_then(|v| v.parse::<u32>().ok())
        .map(ElementId)
}

fn start_reveal(page: &SharedPage, targets: &[EffectTarget], reduced_motion: bool) -> anyhow::Result<()> {
    let mut observed = Vec::new();
    {
        let p = page.borrow();
        for t in targets.iter().filter(|t| t.reveal) {
            let Some(el) = p.style.element(t.id) else { continue };
            if t.motion_allowed(reduced_motion) {
                observed.push((t.id, el.clone()));
            } else {
                _ = el.class_list().add_1(REVEAL_CLASS);
            }
        }
    }
    if observed.is_empty() {
        return Ok(());
    }
    page.borrow_mut().effects.reveal = RevealTracker::new(observed.iter().map(|(id, _)| *id));

    let p = page.clone();
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, observer: web::IntersectionObserver| {
            let Ok(mut g) = p.try_borrow_mut() else { return };
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let Some(id) = effect_id(&target) else { continue };
                if g.effects.reveal.on_intersect(id, entry.is_intersecting()) {
                    _ = target.class_list().add_1(REVEAL_CLASS);
                    observer.unobserve(&target);
                }
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);

    let init = web::IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
    let observer =
        web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|e| anyhow::anyhow!("IntersectionObserver: {:?}", e))?;
    callback.forget();
    for (_, el) in observed.iter() {
        observer.observe(el);
    }

    let mut g = page.borrow_mut();
    let handle = g.host.adopt_observer(observer);
    g.backdrop.handles_mut().observers.push(handle);
    Ok(())
}

fn start_typewriters(page: &SharedPage, targets: &[EffectTarget], reduced_motion: bool) -> anyhow::Result<()> {
    {
        let mut g = page.borrow_mut();
        let Page { style, effects, .. } = &mut *g;
        for t in targets {
            let Some(cfg) = &t.typewriter else { continue };
            let Some(el) = style.element(t.id) else { continue };
            let mut tw = Typewriter::new(cfg);
            if t.motion_allowed(reduced_motion) {
                // screen readers get the whole line at once
                _ = el.set_attribute("aria-label", &cfg.text);
                el.set_text_content(Some(""));
                effects.typewriters.push((t.id, tw));
            } else {
                el.set_text_content(Some(tw.finish()));
            }
        }
        if effects.typewriters.is_empty() {
            return Ok(());
        }
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let p = page.clone();
    let tick = Closure::wrap(Box::new(move || {
        let Ok(mut g) = p.try_borrow_mut() else { return };
        let Page {
            backdrop,
            style,
            host,
            effects,
            ..
        } = &mut *g;
        if backdrop.is_torn_down() {
            return;
        }
        let now = instant::Instant::now();
        let dt = effects
            .last_tick
            .map(|t| now.duration_since(t).as_secs_f64() * 1000.0)
            .unwrap_or(TYPEWRITER_TICK_MS as f64);
        effects.last_tick = Some(now);
        for (id, tw) in effects.typewriters.iter_mut() {
            if let (Some(text), Some(el)) = (tw.advance(dt), style.element(*id)) {
                el.set_text_content(Some(text));
            }
        }
        if effects.all_typed() {
            backdrop.handles_mut().clear_timers(host);
        }
    }) as Box<dyn FnMut()>);

    let id = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            TYPEWRITER_TICK_MS,
        )
        .map_err(|e| anyhow::anyhow!("setInterval: {:?}", e))?;
    tick.forget();
    page.borrow_mut()
        .backdrop
        .handles_mut()
        .timers
        .push(TimerHandle(id));
    Ok(())
}
