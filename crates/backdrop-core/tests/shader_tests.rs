use backdrop_core::scene::{LightKind, SceneObjects};
use backdrop_core::shader::*;
use glam::{Vec2, Vec3};
use std::mem::size_of;

fn parse(src: &str, name: &str) -> naga::Module {
    naga::front::wgsl::parse_str(src)
        .unwrap_or_else(|e| panic!("{name}: naga WGSL parse error:\n{e}"))
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module
        .entry_points
        .iter()
        .map(|ep| ep.name.as_str())
        .collect()
}

#[test]
fn scene_shader_parses_with_expected_entry_points() {
    let module = parse(SCENE_WGSL, "scene.wgsl");
    let eps = entry_points(&module);
    for name in ["vs_solid", "fs_solid", "vs_particle", "fs_particle"] {
        assert!(eps.contains(&name), "missing {name}");
    }
}

#[test]
fn backdrop_shader_parses_with_expected_entry_points() {
    let module = parse(BACKDROP_WGSL, "backdrop.wgsl");
    let eps = entry_points(&module);
    assert!(eps.contains(&"vs_backdrop"));
    assert!(eps.contains(&"fs_backdrop"));
}

#[test]
fn backdrop_asset_carries_its_version() {
    let header = format!("// Backdrop v{}", BACKDROP_SHADER_VERSION);
    assert!(BACKDROP_WGSL.starts_with(&header));
}

#[test]
fn uniform_layouts_match_wgsl_sizes() {
    assert_eq!(size_of::<Globals>(), 176);
    assert_eq!(size_of::<SolidUniforms>(), 96);
    assert_eq!(size_of::<ParticleUniforms>(), 96);
    assert_eq!(size_of::<BackdropUniforms>(), 16);
}

#[test]
fn globals_pack_ambient_and_point_lights() {
    let objects = SceneObjects::new(1200, 600, 1);
    let g = Globals::from_scene(&objects, 1200, 600);

    let ambient = objects
        .lights
        .iter()
        .find(|l| l.kind == LightKind::Ambient)
        .expect("ambient light");
    let expected = ambient.color * ambient.intensity;
    assert_eq!(&g.ambient[..3], &expected.to_array());

    let points: Vec<_> = objects
        .lights
        .iter()
        .filter(|l| l.kind == LightKind::Point)
        .collect();
    for (packed, light) in g.lights.iter().zip(points) {
        assert_eq!(&packed.position[..3], &light.position.to_array());
        assert_eq!(packed.color[3], light.intensity);
    }
    assert_eq!(g.viewport, [1200.0, 600.0, 2.0, 0.0]);
}

#[test]
fn solid_uniforms_carry_opacity_in_alpha() {
    let mut objects = SceneObjects::new(800, 600, 1);
    objects.solids[1].material.opacity = 0.25;
    let u = SolidUniforms::from_scene(&objects, 1).expect("solid 1");
    assert_eq!(u.color[3], 0.25);
    assert!(SolidUniforms::from_scene(&objects, 3).is_none());
}

#[test]
fn backdrop_uniforms_follow_scene_params() {
    let mut objects = SceneObjects::new(800, 600, 1);
    objects.backdrop.time = 4.5;
    objects.backdrop.scroll = 0.75;
    let u = BackdropUniforms::from_scene(&objects, 800, 600);
    assert_eq!(u.time, 4.5);
    assert_eq!(u.scroll, 0.75);
    assert_eq!(u.resolution, [800.0, 600.0]);
}

#[test]
fn backdrop_blends_base_then_glow_then_grain_then_alpha() {
    let samples = [
        (Vec2::new(0.1, 0.2), 0.0, 0.0),
        (Vec2::new(0.5, 0.6), 3.25, 0.4),
        (Vec2::new(0.9, 0.95), 12.0, 1.0),
    ];
    for (uv, t, s) in samples {
        let c = backdrop_color(uv, t, s);
        let mut expected = backdrop_base(uv, t, s);
        expected += backdrop_glow(uv, s);
        expected += Vec3::splat(backdrop_grain(uv, t));
        assert_eq!(c.truncate(), expected);
        assert_eq!(c.w, BACKDROP_ALPHA);
    }
}

#[test]
fn glow_band_peaks_at_its_scroll_shifted_row() {
    let peak = backdrop_glow(Vec2::new(0.3, 0.6), 0.0);
    assert!((peak - BACKDROP_GLOW_TINT * BACKDROP_GLOW_STRENGTH).length() < 1e-6);
    // scrolling moves the band down the screen
    let shifted = backdrop_glow(Vec2::new(0.3, 0.2), 1.0);
    assert!((shifted - peak).length() < 1e-5);
    assert!(backdrop_glow(Vec2::new(0.3, 0.0), 0.0).length() < peak.length() * 0.01);
}

#[test]
fn grain_is_small_and_centered() {
    for i in 0..64 {
        let uv = Vec2::new(i as f32 / 64.0, 1.0 - i as f32 / 64.0);
        let g = backdrop_grain(uv, i as f32 * 0.1);
        assert!(g.abs() <= BACKDROP_GRAIN_STRENGTH * 0.5);
    }
}

#[test]
fn base_gradient_stays_between_its_colors() {
    let low = BACKDROP_COLOR_LOW.min(BACKDROP_COLOR_HIGH);
    let high = BACKDROP_COLOR_LOW.max(BACKDROP_COLOR_HIGH);
    for i in 0..=10 {
        let c = backdrop_base(Vec2::new(0.5, i as f32 / 10.0), 1.0, 0.3);
        assert!(c.cmpge(low - 1e-6).all() && c.cmple(high + 1e-6).all());
    }
}
