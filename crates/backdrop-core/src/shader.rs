//! Shader assets and their uniform layouts.
//!
//! The `#[repr(C)]` structs here mirror the WGSL uniform blocks byte for byte
//! and are filled from [`SceneObjects`] once per committed frame.

use crate::scene::{LightKind, SceneObjects};
use glam::{Vec2, Vec3, Vec4};

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static BACKDROP_WGSL: &str = include_str!("../shaders/backdrop.wgsl");

/// Bumped whenever the backdrop's uniform interface or blend order changes.
pub const BACKDROP_SHADER_VERSION: u32 = 1;

pub const MAX_POINT_LIGHTS: usize = 2;

// Keep in sync with backdrop.wgsl
pub const BACKDROP_COLOR_LOW: Vec3 = Vec3::new(0.027, 0.035, 0.078);
pub const BACKDROP_COLOR_HIGH: Vec3 = Vec3::new(0.106, 0.086, 0.204);
pub const BACKDROP_GLOW_TINT: Vec3 = Vec3::new(0.35, 0.42, 0.95);
pub const BACKDROP_GLOW_STRENGTH: f32 = 0.18;
pub const BACKDROP_GRAIN_STRENGTH: f32 = 0.035;
pub const BACKDROP_ALPHA: f32 = 1.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightPacked {
    pub position: [f32; 4],
    /// rgb color, w intensity
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub lights: [PointLightPacked; MAX_POINT_LIGHTS],
    /// width, height, aspect, unused
    pub viewport: [f32; 4],
}

impl Globals {
    pub fn from_scene(scene: &SceneObjects, width: u32, height: u32) -> Self {
        let mut ambient = Vec3::ZERO;
        let mut lights = [PointLightPacked::default(); MAX_POINT_LIGHTS];
        let mut next = 0;
        for l in scene.lights.iter() {
            match l.kind {
                LightKind::Ambient => ambient += l.color * l.intensity,
                LightKind::Point if next < MAX_POINT_LIGHTS => {
                    lights[next] = PointLightPacked {
                        position: l.position.extend(1.0).to_array(),
                        color: l.color.extend(l.intensity).to_array(),
                    };
                    next += 1;
                }
                LightKind::Point => {}
            }
        }
        Self {
            view_proj: scene.camera.view_proj().to_cols_array_2d(),
            camera_pos: scene.camera.eye.extend(1.0).to_array(),
            ambient: ambient.extend(0.0).to_array(),
            lights,
            viewport: [
                width as f32,
                height as f32,
                scene.camera.aspect,
                0.0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SolidUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub emissive: [f32; 4],
}

impl SolidUniforms {
    pub fn from_scene(scene: &SceneObjects, index: usize) -> Option<Self> {
        let solid = scene.solids.get(index)?;
        let model = scene.solid_world_matrix(index)?;
        let m = &solid.material;
        Some(Self {
            model: model.to_cols_array_2d(),
            color: m.color.extend(m.opacity).to_array(),
            emissive: m.emissive.extend(m.emissive_intensity).to_array(),
        })
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x point size in pixels
    pub params: [f32; 4],
}

impl ParticleUniforms {
    pub fn from_scene(scene: &SceneObjects) -> Self {
        let p = &scene.particles;
        Self {
            model: p.model_matrix().to_cols_array_2d(),
            color: p.color.extend(p.opacity).to_array(),
            params: [p.size_px, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackdropUniforms {
    pub time: f32,
    pub scroll: f32,
    pub resolution: [f32; 2],
}

impl BackdropUniforms {
    pub fn from_scene(scene: &SceneObjects, width: u32, height: u32) -> Self {
        Self {
            time: scene.backdrop.time,
            scroll: scene.backdrop.scroll,
            resolution: [width as f32, height as f32],
        }
    }
}

/// Full-screen quad corners for the backdrop pass, two triangles.
pub const BACKDROP_QUAD: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

// CPU mirror of fs_backdrop, used to pin the blend order in tests.

#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
pub fn hash12(p: Vec2) -> f32 {
    fract(p.dot(Vec2::new(12.9898, 78.233)).sin() * 43758.5453)
}

pub fn backdrop_base(uv: Vec2, time: f32, scroll: f32) -> Vec3 {
    let wave = (uv.x * 6.0 + time * 0.35 + scroll * 4.0).sin() * 0.06;
    BACKDROP_COLOR_LOW.lerp(BACKDROP_COLOR_HIGH, (uv.y + wave).clamp(0.0, 1.0))
}

pub fn backdrop_glow(uv: Vec2, scroll: f32) -> Vec3 {
    let d = (uv.y - 0.6 + scroll * 0.4) * 5.0;
    BACKDROP_GLOW_TINT * ((-d * d).exp() * BACKDROP_GLOW_STRENGTH)
}

pub fn backdrop_grain(uv: Vec2, time: f32) -> f32 {
    (hash12(uv * 512.0 + Vec2::new(time * 37.0, time * 17.0)) - 0.5) * BACKDROP_GRAIN_STRENGTH
}

/// Base gradient, then glow tint, then grain, then the fixed alpha.
pub fn backdrop_color(uv: Vec2, time: f32, scroll: f32) -> Vec4 {
    let color =
        backdrop_base(uv, time, scroll) + backdrop_glow(uv, scroll) + Vec3::splat(backdrop_grain(uv, time));
    color.extend(BACKDROP_ALPHA)
}
