mod common;

use backdrop_core::capability::Capabilities;
use backdrop_core::config::LoopConfig;
use backdrop_core::effects::PageConfig;
use backdrop_core::error::BuildError;
use backdrop_core::frame::TickOutcome;
use backdrop_core::lifecycle::{FrameHandle, TimerHandle};
use backdrop_core::pointer::{ElementRect, FocusKind, PointerSample};
use backdrop_core::runtime::Backdrop;
use backdrop_core::scene::SceneResource;
use backdrop_core::scroll::ScrollSource;
use backdrop_core::style::{ElementId, VAR_SCROLL, VAR_TILT_X};
use common::*;
use glam::Vec2;

fn wide() -> Capabilities {
    Capabilities::probe(false, 1440.0)
}

fn native_page() -> Backdrop<CountingBackend> {
    Backdrop::new(wide(), PageConfig::default(), LoopConfig::default(), 0.0, 2000.0)
}

fn smooth_page() -> Backdrop<CountingBackend> {
    Backdrop::new(
        wide(),
        PageConfig { smooth_scroll: true },
        LoopConfig::default(),
        0.0,
        2000.0,
    )
}

fn no_rects(_: ElementId) -> Option<ElementRect> {
    None
}

#[test]
fn frame_loop_reschedules_and_stores_the_handle() {
    let mut page = native_page();
    let (graph, log) = scene(1440, 900);
    assert!(page.build_scene(|| Ok(graph)));
    let mut ids = FrameIds::default();

    assert_eq!(page.on_frame(0.0, || ids.next()), TickOutcome::Committed);
    assert_eq!(page.lifecycle().handles.frame, Some(FrameHandle(1)));
    assert_eq!(page.on_frame(5.0, || ids.next()), TickOutcome::Throttled);
    assert_eq!(page.lifecycle().handles.frame, Some(FrameHandle(2)));
    assert_eq!(log.borrow().draws, 1);
}

#[test]
fn failed_build_disables_visuals_but_keeps_the_page_working() {
    let mut page = native_page();
    assert!(!page.build_scene(|| Err(BuildError::ContextUnavailable("no adapter".into()))));
    assert!(!page.visuals_enabled());

    let mut ids = FrameIds::default();
    assert_eq!(page.on_frame(0.0, || ids.next()), TickOutcome::Inactive);

    let mut sink = RecordingSink::default();
    let mut calls = 0;
    page.on_native_scroll(|| {
        calls += 1;
        ids.next()
    });
    assert!(page.on_native_read(500.0, 1000.0, &mut sink));
    assert_eq!(calls, 1);
    assert_eq!(sink.root_writes(VAR_SCROLL), vec!["0.5000"]);
}

#[test]
fn stale_frame_after_teardown_is_a_no_op() {
    let mut page = native_page();
    let (graph, log) = scene(1440, 900);
    page.build_scene(|| Ok(graph));
    let mut ids = FrameIds::default();
    page.on_frame(0.0, || ids.next());

    let mut host = CountingHost::default();
    assert!(page.teardown(&mut host));
    assert!(!page.teardown(&mut host));
    assert_eq!(host.cancelled_frames, vec![FrameHandle(1)]);
    assert_eq!(log.borrow().released, SceneResource::all(3));

    let mut rescheduled = false;
    let outcome = page.on_frame(100.0, || {
        rescheduled = true;
        ids.next()
    });
    assert_eq!(outcome, TickOutcome::Inactive);
    assert!(!rescheduled);
    assert!(page.lifecycle().handles.is_empty());
    assert_eq!(log.borrow().draws, 1);
}

#[test]
fn teardown_clears_registered_timers_and_driver() {
    let mut page = smooth_page();
    let mut ids = FrameIds::default();
    page.handles_mut().timers.push(TimerHandle(7));
    assert!(page.on_wheel(400.0, || ids.next()));
    assert!(!page.damped().expect("driver").is_settled());

    let mut host = CountingHost::default();
    page.teardown(&mut host);
    assert_eq!(host.cleared_timers, vec![TimerHandle(7)]);
    assert_eq!(host.cancelled_frames, vec![FrameHandle(1)]);
    assert!(page.damped().expect("driver").is_settled());
    assert!(!page.on_wheel(100.0, || ids.next()));
}

#[test]
fn smooth_scroll_page_uses_the_damped_driver_only() {
    let mut page = smooth_page();
    assert_eq!(page.scroll_source(), ScrollSource::Damped);

    let mut ids = FrameIds::default();
    let mut requested = 0;
    page.on_native_scroll(|| {
        requested += 1;
        ids.next()
    });
    assert_eq!(requested, 0);

    let mut sink = RecordingSink::default();
    assert!(page.on_wheel(1000.0, || ids.next()));
    // a second wheel event while the driver is pending does not schedule again
    assert!(page.on_wheel(0.0, || panic!("already scheduled")));

    let mut ticks = 0;
    while page.lifecycle().handles.scroll_driver.is_some() {
        page.on_driver_frame(&mut sink, || ids.next());
        ticks += 1;
        assert!(ticks < 500);
    }
    assert_eq!(page.damped().expect("driver").offset(), 1000.0);
    assert_eq!(page.targets().scroll, 0.5);
    assert_eq!(sink.root_writes(VAR_SCROLL).last().copied(), Some("0.5000"));
}

#[test]
fn keyboard_scroll_is_adopted_only_while_the_driver_rests() {
    let mut page = smooth_page();
    let mut sink = RecordingSink::default();
    let mut ids = FrameIds::default();

    assert!(page.on_external_scroll(500.0, &mut sink));
    assert_eq!(page.damped().expect("driver").offset(), 500.0);
    assert_eq!(sink.root_writes(VAR_SCROLL).last().copied(), Some("0.2500"));

    // our own scroll_to lands on the driver's offset: nothing to adopt
    assert!(!page.on_external_scroll(500.0, &mut sink));

    assert!(page.on_wheel(200.0, || ids.next()));
    assert!(!page.on_external_scroll(0.0, &mut sink));
    assert_eq!(page.damped().expect("driver").target(), 700.0);

    let mut native = native_page();
    assert!(!native.on_external_scroll(300.0, &mut sink));
}

#[test]
fn reduced_motion_falls_back_to_native_scroll() {
    let caps = Capabilities::probe(true, 1440.0);
    let page: Backdrop<CountingBackend> = Backdrop::new(
        caps,
        PageConfig { smooth_scroll: true },
        LoopConfig::default(),
        0.0,
        2000.0,
    );
    assert_eq!(page.scroll_source(), ScrollSource::Native);
    assert!(page.damped().is_none());
    assert!(!page.visuals_enabled());
}

#[test]
fn native_scroll_reads_are_coalesced_per_frame() {
    let mut page = native_page();
    let mut ids = FrameIds::default();
    let mut requested = 0;
    for _ in 0..10 {
        page.on_native_scroll(|| {
            requested += 1;
            ids.next()
        });
    }
    assert_eq!(requested, 1);
    assert_eq!(page.lifecycle().handles.scroll_read, Some(FrameHandle(1)));

    let mut sink = RecordingSink::default();
    assert!(page.on_native_read(250.0, 1000.0, &mut sink));
    assert!(page.lifecycle().handles.scroll_read.is_none());
    // a read without a pending request is ignored
    assert!(!page.on_native_read(900.0, 1000.0, &mut sink));
    assert_eq!(page.targets().scroll, 0.25);
}

#[test]
fn hidden_page_pauses_the_loop() {
    let mut page = native_page();
    let (graph, log) = scene(1440, 900);
    page.build_scene(|| Ok(graph));
    let mut ids = FrameIds::default();

    page.on_visibility(true);
    assert_eq!(page.on_frame(0.0, || ids.next()), TickOutcome::Hidden);
    assert_eq!(page.on_frame(100.0, || ids.next()), TickOutcome::Hidden);
    page.on_visibility(false);
    assert_eq!(page.on_frame(200.0, || ids.next()), TickOutcome::Committed);
    assert_eq!(log.borrow().draws, 1);
}

#[test]
fn page_hidden_at_load_never_draws_until_shown() {
    let mut page = native_page();
    page.on_visibility(true);
    let (graph, log) = scene(1440, 900);
    assert!(page.build_scene(|| Ok(graph)));
    let mut ids = FrameIds::default();

    assert_eq!(page.on_frame(0.0, || ids.next()), TickOutcome::Hidden);
    assert_eq!(page.on_frame(50.0, || ids.next()), TickOutcome::Hidden);
    assert_eq!(log.borrow().draws, 0);
    assert!(page.lifecycle().handles.frame.is_some());

    page.on_visibility(false);
    assert_eq!(page.on_frame(100.0, || ids.next()), TickOutcome::Committed);
    assert_eq!(log.borrow().draws, 1);
}

#[test]
fn resize_adapts_scene_and_refreshes_layout() {
    let mut page = smooth_page();
    let (graph, log) = scene(1440, 900);
    page.build_scene(|| Ok(graph));
    let mut layout = LayoutCounter::default();
    let mut sink = RecordingSink::default();
    page.on_scroll_setup(&mut layout, &mut sink);
    assert_eq!(sink.root_writes(VAR_SCROLL), vec!["0.0000"]);
    page.on_resize(1000, 500, 800.0, &mut layout);

    assert_eq!(layout.refreshes, 2);
    assert_eq!(log.borrow().resizes, vec![(1000, 500)]);
    assert_eq!(page.scene().expect("scene").objects().camera.aspect, 2.0);
    assert_eq!(page.damped().expect("driver").limit(), 800.0);
}

#[test]
fn pointer_and_hover_flow_through_the_page() {
    let mut page = native_page();
    let card = ElementId(3);
    let rect = ElementRect {
        left: 0.0,
        top: 0.0,
        width: 100.0,
        height: 100.0,
    };
    let rect_of = move |id: ElementId| (id == card).then_some(rect);
    let mut sink = RecordingSink::default();

    page.on_enter(card, FocusKind::Tilt);
    let sample = PointerSample {
        client: Vec2::new(50.0, 50.0),
        viewport: Vec2::new(1440.0, 900.0),
        time_ms: 0.0,
    };
    assert!(page.on_pointer_move(sample, &mut sink, &rect_of).is_some());
    assert_eq!(sink.last_element(card, VAR_TILT_X), Some("0.00deg"));
    assert!(page.targets().pointer.x < 0.0);

    page.on_leave(card, FocusKind::Tilt, &mut sink);
    assert_eq!(page.pointer().focus().get(FocusKind::Tilt), None);

    let mut host = CountingHost::default();
    page.teardown(&mut host);
    assert!(page.on_pointer_move(sample, &mut sink, &no_rects).is_none());
}

#[test]
fn scene_built_after_teardown_is_released() {
    let mut page = native_page();
    let mut host = CountingHost::default();
    page.teardown(&mut host);
    let (graph, log) = scene(1440, 900);
    assert!(!page.attach_scene(Ok(graph)));
    assert_eq!(log.borrow().released, SceneResource::all(3));
}
