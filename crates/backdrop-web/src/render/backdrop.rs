use super::helpers::{make_pipeline, uniform_binding, uniform_layout, PipelineDesc};
use backdrop_core::shader::{BackdropUniforms, BACKDROP_QUAD, BACKDROP_WGSL};
use wgpu::util::DeviceExt;

struct BackdropMaterial {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Full-screen backdrop, drawn first and behind everything.
pub(crate) struct BackdropPass {
    quad: Option<wgpu::Buffer>,
    material: Option<BackdropMaterial>,
}

impl BackdropPass {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("backdrop_shader"),
            source: wgpu::ShaderSource::Wgsl(BACKDROP_WGSL.into()),
        });
        let bgl = uniform_layout(device, "backdrop_bgl");
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("backdrop_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        }];
        // never occludes: no depth write, always passes
        let pipeline = make_pipeline(
            device,
            &PipelineDesc {
                label: "backdrop_pipeline",
                layout: &pl,
                shader: &shader,
                vs_entry: "vs_backdrop",
                fs_entry: "fs_backdrop",
                buffers: &buffers,
                color_format,
                blend: None,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::Always,
            },
        );
        let (uniform_buffer, bind_group) =
            uniform_binding::<BackdropUniforms>(device, "backdrop_uniforms", &bgl);
        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop_quad"),
            contents: bytemuck::cast_slice(&BACKDROP_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            quad: Some(quad),
            material: Some(BackdropMaterial {
                pipeline,
                uniform_buffer,
                bind_group,
            }),
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, u: &BackdropUniforms) {
        if let Some(m) = &self.material {
            queue.write_buffer(&m.uniform_buffer, 0, bytemuck::bytes_of(u));
        }
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        let (Some(quad), Some(m)) = (&self.quad, &self.material) else {
            return;
        };
        rpass.set_pipeline(&m.pipeline);
        rpass.set_bind_group(0, &m.bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.slice(..));
        rpass.draw(0..BACKDROP_QUAD.len() as u32, 0..1);
    }

    pub fn release_geometry(&mut self) {
        if let Some(b) = self.quad.take() {
            b.destroy();
        }
    }

    pub fn release_material(&mut self) {
        if let Some(m) = self.material.take() {
            m.uniform_buffer.destroy();
        }
    }
}
