#![cfg(target_arch = "wasm32")]
use backdrop_core::constants::PARTICLE_SEED;
use backdrop_core::{
    Backdrop, BuildError, Capabilities, LoopConfig, SceneGraph, SceneObjects,
};
use backdrop_core::effects::PageConfig;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod dom;
mod effects;
mod events;
mod frame;
mod host;
mod render;
mod style;

use effects::EffectsState;
use frame::FrameCallback;
use host::{WebHost, WebScrollLayout};
use render::GpuScene;
use style::CssVarSink;

/// Everything one page owns. Lives behind a single `Rc<RefCell<_>>` shared
/// by the event, timer and animation-frame closures.
pub(crate) struct Page {
    pub backdrop: Backdrop<GpuScene>,
    pub style: CssVarSink,
    pub host: WebHost,
    pub effects: EffectsState,
    /// Coalesced native scroll read; `None` when the damped driver is active.
    pub native_read: Option<FrameCallback>,
}

pub(crate) type SharedPage = Rc<RefCell<Page>>;

impl Page {
    pub fn request_native_read(&mut self) {
        if let Some(cb) = self.native_read.clone() {
            self.backdrop.on_native_scroll(|| frame::request_frame(&cb));
        }
    }

    pub fn teardown(&mut self) {
        if self.backdrop.teardown(&mut self.host) {
            self.effects.cancel();
        }
    }
}

thread_local! {
    static PAGE: RefCell<Option<SharedPage>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stop every loop, timer and observer and release GPU resources. Safe to
/// call any number of times.
#[wasm_bindgen]
pub fn teardown() {
    PAGE.with(|slot| {
        if let Some(page) = slot.borrow().as_ref() {
            match page.try_borrow_mut() {
                Ok(mut p) => p.teardown(),
                Err(_) => log::warn!("[teardown] page busy; ignored"),
            }
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;

    let page_config = PageConfig::from_attributes(|name| body.get_attribute(name));
    let reduced_motion = dom::prefers_reduced_motion(&window);
    let (viewport_w, _) = dom::viewport_size(&window);
    let caps = Capabilities::probe(reduced_motion, viewport_w);
    log::info!(
        "[init] visuals={} reduced_motion={} width={}",
        caps.should_enable_visuals(),
        reduced_motion,
        viewport_w
    );

    let backdrop = Backdrop::new(
        caps,
        page_config,
        LoopConfig::default(),
        dom::scroll_offset(&window),
        dom::scrollable_height(&window, &document),
    );
    let mut style = CssVarSink::new(&document);
    let targets = effects::scan(&document, &mut style);

    let page: SharedPage = Rc::new(RefCell::new(Page {
        backdrop,
        style,
        host: WebHost::default(),
        effects: EffectsState::default(),
        native_read: None,
    }));
    PAGE.with(|slot| *slot.borrow_mut() = Some(page.clone()));
    // a page opened in a background tab starts paused
    page.borrow_mut().backdrop.on_visibility(document.hidden());

    events::wire(&page, &targets, reduced_motion);
    {
        let mut guard = page.borrow_mut();
        let p = &mut *guard;
        p.backdrop.on_scroll_setup(&mut WebScrollLayout, &mut p.style);
        p.request_native_read();
    }
    if let Err(e) = effects::start(&page, &targets, reduced_motion) {
        log::warn!("[init] effects unavailable: {:?}", e);
    }

    if !caps.should_enable_visuals() {
        return Ok(());
    }

    let canvas = match document
        .get_element_by_id(dom::CANVAS_ID)
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
    {
        Some(c) => c,
        None => {
            page.borrow_mut()
                .backdrop
                .attach_scene(Err(BuildError::SurfaceMissing));
            return Ok(());
        }
    };
    let (width, height) = dom::sync_canvas_backing_size(&canvas);
    let objects = SceneObjects::new(width, height, PARTICLE_SEED);
    let built = GpuScene::new(canvas, &objects)
        .await
        .map(|gpu| SceneGraph::assemble(objects, gpu));

    let attached = page.borrow_mut().backdrop.attach_scene(built);
    if attached {
        frame::start_loop(&page);
        log::info!("[init] backdrop running at {}x{}", width, height);
    }
    Ok(())
}
