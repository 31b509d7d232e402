//! Scene graph: the fixed set of lights, solids, backdrop and particles.
//!
//! Object count and buffer sizes are fixed at construction; the frame
//! scheduler only changes transform and uniform values. GPU allocations live
//! behind [`SceneBackend`] and are released exactly once by
//! [`SceneGraph::dispose`].

use crate::constants::*;
use crate::error::{Degradation, DrawError};
use crate::geometry;
use crate::state::Camera;
use glam::{EulerRot, Mat4, Quat, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub emissive: Vec3,
    pub base_emissive_intensity: f32,
    pub emissive_intensity: f32,
    pub base_opacity: f32,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingSolid {
    pub position: Vec3,
    pub scale: Vec3,
    /// Euler XYZ, radians. Driven by elapsed time only.
    pub rotation: Vec3,
    /// Radians per second around each axis.
    pub spin: Vec3,
    /// Phase offset for the emissive oscillation.
    pub phase: f32,
    pub material: Material,
}

impl FloatingSolid {
    pub fn local_matrix(&self) -> Mat4 {
        let q = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, q, self.position)
    }
}

/// Shader parameters of the full-scene backdrop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackdropParams {
    pub time: f32,
    pub scroll: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    pub rotation: Vec3,
    pub size_px: f32,
    pub opacity: f32,
    pub color: Vec3,
}

impl ParticleField {
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// Parent transform of the floating solids, driven by smoothed scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupTransform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl GroupTransform {
    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_rotation_translation(q, self.position)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObjects {
    pub camera: Camera,
    pub lights: [Light; 3],
    pub solids: SmallVec<[FloatingSolid; SOLID_COUNT]>,
    pub group: GroupTransform,
    pub backdrop: BackdropParams,
    pub particles: ParticleField,
}

impl SceneObjects {
    /// The fixed scene for a surface of `width` x `height` pixels.
    pub fn new(width: u32, height: u32, particle_seed: u64) -> Self {
        let mut camera = Camera {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        };
        camera.set_viewport(width, height);

        let lights = [
            Light {
                kind: LightKind::Ambient,
                color: Vec3::new(0.55, 0.6, 0.85),
                intensity: 0.35,
                position: Vec3::ZERO,
            },
            Light {
                kind: LightKind::Point,
                color: Vec3::new(0.45, 0.55, 1.0),
                intensity: 1.6,
                position: Vec3::new(4.0, 3.0, 5.0),
            },
            Light {
                kind: LightKind::Point,
                color: Vec3::new(0.95, 0.45, 0.85),
                intensity: 1.1,
                position: Vec3::new(-5.0, -2.0, 3.0),
            },
        ];

        let solid = |position: Vec3,
                     scale: Vec3,
                     spin: Vec3,
                     phase: f32,
                     color: Vec3,
                     emissive: Vec3,
                     opacity: f32| {
            FloatingSolid {
                position,
                scale,
                rotation: Vec3::ZERO,
                spin,
                phase,
                material: Material {
                    color,
                    emissive,
                    base_emissive_intensity: 0.35,
                    emissive_intensity: 0.35,
                    base_opacity: opacity,
                    opacity,
                },
            }
        };
        let solids = SmallVec::from_buf([
            solid(
                Vec3::new(-2.6, 0.9, -1.0),
                Vec3::new(1.1, 1.35, 1.1),
                Vec3::new(0.12, 0.18, 0.0),
                0.0,
                Vec3::new(0.32, 0.38, 0.95),
                Vec3::new(0.18, 0.22, 0.7),
                0.9,
            ),
            solid(
                Vec3::new(2.4, -0.6, -2.0),
                Vec3::new(1.5, 1.0, 1.2),
                Vec3::new(-0.08, 0.14, 0.05),
                1.3,
                Vec3::new(0.78, 0.34, 0.88),
                Vec3::new(0.5, 0.16, 0.55),
                0.85,
            ),
            solid(
                Vec3::new(0.4, 1.8, -3.5),
                Vec3::new(0.7, 0.7, 0.95),
                Vec3::new(0.1, -0.12, 0.07),
                2.6,
                Vec3::new(0.3, 0.8, 0.78),
                Vec3::new(0.12, 0.45, 0.42),
                0.8,
            ),
        ]);

        let particles = ParticleField {
            positions: geometry::particle_positions(PARTICLE_COUNT, PARTICLE_BOUNDS, particle_seed),
            rotation: Vec3::ZERO,
            size_px: PARTICLE_SIZE_PX,
            opacity: PARTICLE_OPACITY,
            color: Vec3::new(0.75, 0.82, 1.0),
        };

        Self {
            camera,
            lights,
            solids,
            group: GroupTransform::default(),
            backdrop: BackdropParams::default(),
            particles,
        }
    }

    /// World matrix of solid `i` (group transform applied).
    pub fn solid_world_matrix(&self, i: usize) -> Option<Mat4> {
        self.solids
            .get(i)
            .map(|s| self.group.matrix() * s.local_matrix())
    }
}

/// One GPU-side allocation owned by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneResource {
    ParticleGeometry,
    ParticleMaterial,
    BackdropGeometry,
    BackdropMaterial,
    SolidGeometry,
    SolidMaterial(usize),
    /// Camera and light uniforms shared by solids and particles.
    SharedUniforms,
    DepthTarget,
}

impl SceneResource {
    /// Every allocation of a scene with `solids` solid instances, in release order.
    pub fn all(solids: usize) -> Vec<SceneResource> {
        let mut v = vec![
            SceneResource::ParticleGeometry,
            SceneResource::ParticleMaterial,
            SceneResource::BackdropGeometry,
            SceneResource::BackdropMaterial,
        ];
        v.extend((0..solids).map(SceneResource::SolidMaterial));
        v.push(SceneResource::SolidGeometry);
        v.push(SceneResource::SharedUniforms);
        v.push(SceneResource::DepthTarget);
        v
    }
}

/// The drawing side of the scene (wgpu on the web, mocks in tests).
pub trait SceneBackend {
    fn draw(&mut self, scene: &SceneObjects) -> Result<(), DrawError>;
    fn resize(&mut self, width: u32, height: u32);
    fn release(&mut self, resource: SceneResource);
}

pub struct SceneGraph<B: SceneBackend> {
    objects: SceneObjects,
    backend: B,
    disposed: bool,
}

impl<B: SceneBackend> SceneGraph<B> {
    pub fn assemble(objects: SceneObjects, backend: B) -> Self {
        log::debug!(
            "[scene] solids={} particles={}",
            objects.solids.len(),
            objects.particles.positions().len()
        );
        Self {
            objects,
            backend,
            disposed: false,
        }
    }

    pub fn objects(&self) -> &SceneObjects {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut SceneObjects {
        &mut self.objects
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn draw(&mut self) -> Result<(), DrawError> {
        if self.disposed {
            return Ok(());
        }
        self.backend.draw(&self.objects)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.disposed || width == 0 || height == 0 {
            return;
        }
        self.objects.camera.set_viewport(width, height);
        self.backend.resize(width, height);
    }

    /// Release every allocation exactly once. Later calls are absorbed.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            log::debug!("[scene] {}", Degradation::ResourceAlreadyReleased);
            return false;
        }
        self.disposed = true;
        for r in SceneResource::all(self.objects.solids.len()) {
            self.backend.release(r);
        }
        true
    }
}
