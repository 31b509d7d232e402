use super::helpers::{make_pipeline, uniform_binding, uniform_layout, PipelineDesc};
use backdrop_core::shader::ParticleUniforms;
use glam::Vec3;
use wgpu::util::DeviceExt;

/// Corners per particle quad, expanded in the vertex shader.
const QUAD_VERTICES: u32 = 6;

struct ParticleMaterial {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Point cloud drawn as screen-space sprites, one instance per point.
pub(crate) struct ParticlesPass {
    instances: Option<wgpu::Buffer>,
    count: u32,
    material: Option<ParticleMaterial>,
}

impl ParticlesPass {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        globals_bgl: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        positions: &[Vec3],
    ) -> Self {
        let bgl = uniform_layout(device, "particle_bgl");
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle_pl"),
            bind_group_layouts: &[globals_bgl, &bgl],
            push_constant_ranges: &[],
        });
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
        }];
        // depth tested against the solids but never written
        let pipeline = make_pipeline(
            device,
            &PipelineDesc {
                label: "particle_pipeline",
                layout: &pl,
                shader,
                vs_entry: "vs_particle",
                fs_entry: "fs_particle",
                buffers: &buffers,
                color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
            },
        );
        let (uniform_buffer, bind_group) =
            uniform_binding::<ParticleUniforms>(device, "particle_uniforms", &bgl);
        let packed: Vec<[f32; 3]> = positions.iter().map(|p| p.to_array()).collect();
        let instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle_positions"),
            contents: bytemuck::cast_slice(&packed),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            instances: Some(instances),
            count: packed.len() as u32,
            material: Some(ParticleMaterial {
                pipeline,
                uniform_buffer,
                bind_group,
            }),
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, u: &ParticleUniforms) {
        if let Some(m) = &self.material {
            queue.write_buffer(&m.uniform_buffer, 0, bytemuck::bytes_of(u));
        }
    }

    /// Expects the shared globals already bound at group 0.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        let (Some(instances), Some(m)) = (&self.instances, &self.material) else {
            return;
        };
        if self.count == 0 {
            return;
        }
        rpass.set_pipeline(&m.pipeline);
        rpass.set_bind_group(1, &m.bind_group, &[]);
        rpass.set_vertex_buffer(0, instances.slice(..));
        rpass.draw(0..QUAD_VERTICES, 0..self.count);
    }

    pub fn release_geometry(&mut self) {
        if let Some(b) = self.instances.take() {
            b.destroy();
        }
    }

    pub fn release_material(&mut self) {
        if let Some(m) = self.material.take() {
            m.uniform_buffer.destroy();
        }
    }
}
