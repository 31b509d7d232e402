mod common;

use backdrop_core::config::LoopConfig;
use backdrop_core::constants::*;
use backdrop_core::error::DrawError;
use backdrop_core::frame::{apply_frame, emissive_intensity, fade_factor, FrameScheduler, TickOutcome};
use backdrop_core::scene::SceneObjects;
use backdrop_core::state::{InputTargets, RenderState};
use common::{scene, CountingBackend};
use glam::{Vec2, Vec3};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn dense_ticks_commit_at_most_once_per_budget() {
    let (mut graph, log) = scene(1280, 720);
    let mut sched = FrameScheduler::default();
    let targets = InputTargets::default();

    let mut commits = Vec::new();
    let mut t = 0.0;
    while t <= 1000.0 {
        if sched.tick(t, &targets, Some(&mut graph)) == TickOutcome::Committed {
            commits.push(t);
        }
        t += 5.0;
    }
    for pair in commits.windows(2) {
        assert!(pair[1] - pair[0] >= FRAME_INTERVAL_MS);
    }
    assert!(commits.len() as f64 <= 1000.0 / FRAME_INTERVAL_MS + 1.0);
    // 5 ms spacing lands the next commit at +25 ms
    assert_eq!(commits.len(), 41);
    assert_eq!(log.borrow().draws, 41);
    assert_eq!(sched.committed_frames(), 41);
}

#[test]
fn hidden_page_does_no_frame_work() {
    let (mut graph, log) = scene(1280, 720);
    let mut sched = FrameScheduler::default();
    let targets = InputTargets {
        pointer: Vec2::new(1.0, 1.0),
        scroll: 1.0,
    };

    assert_eq!(sched.tick(0.0, &targets, Some(&mut graph)), TickOutcome::Committed);
    let before = sched.state().clone();

    sched.set_running(false);
    for i in 1..200 {
        let t = i as f64 * 5.0;
        assert_eq!(sched.tick(t, &targets, Some(&mut graph)), TickOutcome::Hidden);
    }
    assert_eq!(sched.state().last_frame_ms, Some(0.0));
    assert_eq!(sched.state().pointer_current, before.pointer_current);
    assert_eq!(sched.state().scroll_current, before.scroll_current);
    assert_eq!(log.borrow().draws, 1);

    sched.set_running(true);
    assert_eq!(sched.tick(1000.0, &targets, Some(&mut graph)), TickOutcome::Committed);
    assert_eq!(log.borrow().draws, 2);
}

#[test]
fn missing_scene_is_inactive() {
    let mut sched = FrameScheduler::default();
    let targets = InputTargets::default();
    let outcome = sched.tick::<CountingBackend>(0.0, &targets, None);
    assert_eq!(outcome, TickOutcome::Inactive);
    assert_eq!(sched.state().last_frame_ms, None);
}

#[test]
fn disposed_scene_is_inactive() {
    let (mut graph, log) = scene(800, 600);
    graph.dispose();
    let mut sched = FrameScheduler::default();
    let outcome = sched.tick(0.0, &InputTargets::default(), Some(&mut graph));
    assert_eq!(outcome, TickOutcome::Inactive);
    assert_eq!(log.borrow().draws, 0);
}

#[test]
fn pointer_converges_without_overshoot() {
    let (mut graph, _log) = scene(1280, 720);
    let mut sched = FrameScheduler::default();
    let targets = InputTargets {
        pointer: Vec2::new(1.0, -1.0),
        scroll: 0.0,
    };

    sched.tick(0.0, &targets, Some(&mut graph));
    let first = sched.state().pointer_current;
    assert!(approx(first.x, POINTER_SMOOTHING));
    assert!(approx(first.y, -POINTER_SMOOTHING));

    let mut prev = first;
    for i in 1..300 {
        sched.tick(i as f64 * FRAME_INTERVAL_MS, &targets, Some(&mut graph));
        let p = sched.state().pointer_current;
        assert!(p.x >= prev.x && p.x <= 1.0);
        assert!(p.y <= prev.y && p.y >= -1.0);
        prev = p;
    }
    assert!((prev - targets.pointer).length() < 1e-3);
}

#[test]
fn scroll_uses_its_own_factor() {
    let (mut graph, _log) = scene(1280, 720);
    let mut sched = FrameScheduler::default();
    let targets = InputTargets {
        pointer: Vec2::ZERO,
        scroll: 1.0,
    };
    sched.tick(0.0, &targets, Some(&mut graph));
    assert!(approx(sched.state().scroll_current, SCROLL_SMOOTHING));
    assert_eq!(sched.state().scroll_target, 1.0);
}

#[test]
fn retuned_config_keeps_perceived_speed() {
    let (mut fast_graph, _) = scene(1280, 720);
    let (mut slow_graph, _) = scene(1280, 720);
    let mut fast = FrameScheduler::new(LoopConfig::default().with_frame_interval(11.0));
    let mut slow = FrameScheduler::default();
    let targets = InputTargets {
        pointer: Vec2::new(1.0, 0.0),
        scroll: 0.0,
    };
    for i in 0..20 {
        fast.tick(i as f64 * 11.0, &targets, Some(&mut fast_graph));
    }
    for i in 0..10 {
        slow.tick(i as f64 * 22.0, &targets, Some(&mut slow_graph));
    }
    // twenty half-length frames leave the same gap as ten full ones
    let fast_gap = 1.0 - fast.state().pointer_current.x;
    let slow_gap = 1.0 - slow.state().pointer_current.x;
    assert!((fast_gap - slow_gap).abs() < 1e-4);
}

#[test]
fn fade_factor_shape() {
    assert_eq!(fade_factor(0.0), 1.0);
    assert_eq!(fade_factor(FADE_START), 1.0);
    assert!(approx(fade_factor(0.5), 0.4));
    assert_eq!(fade_factor(0.6), 0.0);
    assert_eq!(fade_factor(0.9), 0.0);
    assert_eq!(fade_factor(1.0), 0.0);
}

#[test]
fn solids_are_fully_faded_past_the_fade_window() {
    let mut objects = SceneObjects::new(1280, 720, 1);
    let state = RenderState {
        scroll_current: 0.6,
        ..RenderState::default()
    };
    apply_frame(&mut objects, &state, 3.0);
    for s in objects.solids.iter() {
        assert_eq!(s.material.opacity, 0.0);
    }
}

#[test]
fn opacity_is_base_times_fade() {
    let mut objects = SceneObjects::new(1280, 720, 1);
    let state = RenderState {
        scroll_current: 0.5,
        ..RenderState::default()
    };
    apply_frame(&mut objects, &state, 0.0);
    for s in objects.solids.iter() {
        assert!(approx(s.material.opacity, s.material.base_opacity * 0.4));
    }
}

#[test]
fn camera_follows_smoothed_pointer() {
    let mut objects = SceneObjects::new(1280, 720, 1);
    let state = RenderState {
        pointer_current: Vec2::new(1.0, -1.0),
        ..RenderState::default()
    };
    apply_frame(&mut objects, &state, 0.0);
    assert_eq!(
        objects.camera.eye,
        Vec3::new(CAMERA_POINTER_X, -CAMERA_POINTER_Y, CAMERA_Z)
    );
    assert_eq!(objects.camera.target, Vec3::ZERO);
}

#[test]
fn time_driven_motion_is_deterministic() {
    let state = RenderState {
        scroll_current: 0.25,
        ..RenderState::default()
    };
    let mut a = SceneObjects::new(1280, 720, 1);
    let mut b = SceneObjects::new(1280, 720, 1);
    apply_frame(&mut a, &state, 12.5);
    apply_frame(&mut b, &RenderState::default(), 1.0);
    apply_frame(&mut b, &state, 12.5);
    assert_eq!(a, b);
    assert_eq!(a.backdrop.time, 12.5);
    assert_eq!(a.backdrop.scroll, 0.25);
}

#[test]
fn scroll_moves_the_solid_group() {
    let mut objects = SceneObjects::new(1280, 720, 1);
    let state = RenderState {
        scroll_current: 1.0,
        ..RenderState::default()
    };
    apply_frame(&mut objects, &state, 0.0);
    assert!(approx(objects.group.position.y, GROUP_SCROLL_LIFT));
    assert!(approx(objects.group.rotation.y, GROUP_SCROLL_TURN));
}

#[test]
fn emissive_has_base_pulse_and_scroll_terms() {
    let base = 0.35;
    assert!(approx(emissive_intensity(base, 0.0, 0.0, 0.0), base));
    assert!(approx(
        emissive_intensity(base, 0.0, 0.0, 1.0),
        base + EMISSIVE_SCROLL_GAIN
    ));
    let peak_t = std::f32::consts::FRAC_PI_2 / EMISSIVE_PULSE_RATE;
    assert!(approx(
        emissive_intensity(base, peak_t, 0.0, 0.0),
        base + EMISSIVE_PULSE_AMPLITUDE
    ));
}

#[test]
fn draw_errors_are_absorbed() {
    let backend = CountingBackend {
        fail_with: Some(DrawError::SurfaceLost),
        ..CountingBackend::default()
    };
    let log = backend.log.clone();
    let mut graph =
        backdrop_core::scene::SceneGraph::assemble(SceneObjects::new(800, 600, 3), backend);
    let mut sched = FrameScheduler::default();
    let outcome = sched.tick(0.0, &InputTargets::default(), Some(&mut graph));
    assert_eq!(outcome, TickOutcome::Committed);
    assert_eq!(log.borrow().draws, 1);
}

#[test]
fn elapsed_time_starts_at_first_commit() {
    let (mut graph, _log) = scene(800, 600);
    let mut sched = FrameScheduler::default();
    let targets = InputTargets::default();
    sched.tick(5_000.0, &targets, Some(&mut graph));
    assert_eq!(graph.objects().backdrop.time, 0.0);
    sched.tick(7_000.0, &targets, Some(&mut graph));
    assert!(approx(graph.objects().backdrop.time, 2.0));
}
