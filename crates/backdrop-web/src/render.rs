mod backdrop;
mod helpers;
mod particles;
mod solids;

use backdrop::BackdropPass;
use backdrop_core::shader::{BackdropUniforms, Globals, ParticleUniforms, SCENE_WGSL};
use backdrop_core::{BuildError, DrawError, SceneBackend, SceneObjects, SceneResource};
use helpers::{uniform_binding, uniform_layout, DepthTarget};
use particles::ParticlesPass;
use solids::SolidsPass;
use web_sys as web;
use wgpu;

struct SharedUniforms {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// wgpu implementation of the scene: backdrop, solids, then particles, all
/// in one pass over the canvas surface.
pub struct GpuScene {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    globals: Option<SharedUniforms>,
    depth: Option<DepthTarget>,
    backdrop: BackdropPass,
    solids: SolidsPass,
    particles: ParticlesPass,
    clear_color: wgpu::Color,
}

impl GpuScene {
    pub async fn new(
        canvas: web::HtmlCanvasElement,
        objects: &SceneObjects,
    ) -> Result<Self, BuildError> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| BuildError::ContextUnavailable(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| BuildError::ContextUnavailable("no WebGPU adapter".into()))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // default limits: older WebGPU implementations reject unknown fields
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| BuildError::DeviceRequest(format!("{:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| BuildError::ContextUnavailable("surface has no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let globals_bgl = uniform_layout(&device, "globals_bgl");
        let (buffer, bind_group) = uniform_binding::<Globals>(&device, "globals", &globals_bgl);
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });

        let backdrop = BackdropPass::new(&device, format);
        let solids = SolidsPass::new(
            &device,
            &scene_shader,
            &globals_bgl,
            format,
            objects.solids.len(),
        );
        let particles = ParticlesPass::new(
            &device,
            &scene_shader,
            &globals_bgl,
            format,
            objects.particles.positions(),
        );
        let depth = DepthTarget::new(&device, width, height);
        log::info!("[gpu] surface {:?} {}x{}", format, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            globals: Some(SharedUniforms { buffer, bind_group }),
            depth: Some(depth),
            backdrop,
            solids,
            particles,
            clear_color: wgpu::Color::BLACK,
        })
    }

    fn write_uniforms(&self, scene: &SceneObjects) {
        let (w, h) = (self.config.width, self.config.height);
        if let Some(g) = &self.globals {
            let globals = Globals::from_scene(scene, w, h);
            self.queue
                .write_buffer(&g.buffer, 0, bytemuck::bytes_of(&globals));
        }
        self.backdrop
            .write(&self.queue, &BackdropUniforms::from_scene(scene, w, h));
        self.solids.write(&self.queue, scene);
        self.particles
            .write(&self.queue, &ParticleUniforms::from_scene(scene));
    }
}

impl SceneBackend for GpuScene {
    fn draw(&mut self, scene: &SceneObjects) -> Result<(), DrawError> {
        let (Some(globals), Some(depth)) = (&self.globals, &self.depth) else {
            return Err(DrawError::Backend("resources released".into()));
        };
        self.write_uniforms(scene);

        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(DrawError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(DrawError::OutOfMemory),
            Err(e) => return Err(DrawError::Backend(e.to_string())),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.backdrop.draw(&mut rpass);
            rpass.set_bind_group(0, &globals.bind_group, &[]);
            self.solids.draw(&mut rpass);
            self.particles.draw(&mut rpass);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        if let Some(old) = self.depth.take() {
            old.destroy();
            self.depth = Some(DepthTarget::new(&self.device, width, height));
        }
    }

    fn release(&mut self, resource: SceneResource) {
        match resource {
            SceneResource::ParticleGeometry => self.particles.release_geometry(),
            SceneResource::ParticleMaterial => self.particles.release_material(),
            SceneResource::BackdropGeometry => self.backdrop.release_geometry(),
            SceneResource::BackdropMaterial => self.backdrop.release_material(),
            SceneResource::SolidGeometry => self.solids.release_geometry(),
            SceneResource::SolidMaterial(i) => self.solids.release_material(i),
            SceneResource::SharedUniforms => {
                if let Some(g) = self.globals.take() {
                    g.buffer.destroy();
                }
            }
            SceneResource::DepthTarget => {
                if let Some(d) = self.depth.take() {
                    d.destroy();
                }
            }
        }
    }
}
