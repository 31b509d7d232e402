use super::helpers::{make_pipeline, uniform_binding, uniform_layout, PipelineDesc};
use backdrop_core::geometry::{icosahedron, MeshVertex};
use backdrop_core::shader::SolidUniforms;
use backdrop_core::SceneObjects;
use wgpu::util::DeviceExt;

/// Mesh and pipeline shared by every solid.
struct SolidGeometry {
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    vertex_count: u32,
}

struct SolidMaterial {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// The floating solids: one shared low-poly mesh, one material per instance.
pub(crate) struct SolidsPass {
    geometry: Option<SolidGeometry>,
    materials: Vec<Option<SolidMaterial>>,
}

impl SolidsPass {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        globals_bgl: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        solid_count: usize,
    ) -> Self {
        let bgl = uniform_layout(device, "solid_bgl");
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("solid_pl"),
            bind_group_layouts: &[globals_bgl, &bgl],
            push_constant_ranges: &[],
        });
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        }];
        let pipeline = make_pipeline(
            device,
            &PipelineDesc {
                label: "solid_pipeline",
                layout: &pl,
                shader,
                vs_entry: "vs_solid",
                fs_entry: "fs_solid",
                buffers: &buffers,
                color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );
        let mesh = icosahedron();
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("solid_mesh"),
            contents: bytemuck::cast_slice(&mesh),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let materials = (0..solid_count)
            .map(|_| {
                let (uniform_buffer, bind_group) =
                    uniform_binding::<SolidUniforms>(device, "solid_uniforms", &bgl);
                Some(SolidMaterial {
                    uniform_buffer,
                    bind_group,
                })
            })
            .collect();
        Self {
            geometry: Some(SolidGeometry {
                pipeline,
                vertices,
                vertex_count: mesh.len() as u32,
            }),
            materials,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, scene: &SceneObjects) {
        for (i, slot) in self.materials.iter().enumerate() {
            if let (Some(m), Some(u)) = (slot, SolidUniforms::from_scene(scene, i)) {
                queue.write_buffer(&m.uniform_buffer, 0, bytemuck::bytes_of(&u));
            }
        }
    }

    /// Expects the shared globals already bound at group 0.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        let Some(g) = &self.geometry else { return };
        rpass.set_pipeline(&g.pipeline);
        rpass.set_vertex_buffer(0, g.vertices.slice(..));
        for m in self.materials.iter().flatten() {
            rpass.set_bind_group(1, &m.bind_group, &[]);
            rpass.draw(0..g.vertex_count, 0..1);
        }
    }

    pub fn release_geometry(&mut self) {
        if let Some(g) = self.geometry.take() {
            g.vertices.destroy();
        }
    }

    pub fn release_material(&mut self, index: usize) {
        if let Some(m) = self.materials.get_mut(index).and_then(Option::take) {
            m.uniform_buffer.destroy();
        }
    }
}
