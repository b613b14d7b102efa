//! The basic scene pipeline.
//!
//! Shading happens on the CPU while a frame is recorded: [`FrameBuilder`] is a
//! [`Renderer`] that transforms every mesh face into view space, lights its
//! vertices with the lights drawn earlier in the frame (ambient plus a Lambert
//! term with attenuation and spot cones) and appends the result to one vertex
//! list. The GPU side only projects and rasterises that list.

use cgmath::{InnerSpace, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::{
    data_structures::{
        light::{LightKind, OMNI_CUTOFF},
        material::Material,
        mesh::Vertex,
    },
    render::{LightDraw, MeshDraw, MeshPass, Renderer},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A view-space, pre-lit vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl SceneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub projection: [[f32; 4]; 4],
}

impl Globals {
    pub fn new(projection: Matrix4<f32>) -> Self {
        Self {
            projection: (OPENGL_TO_WGPU_MATRIX * projection).into(),
        }
    }
}

/// A light as seen from the camera.
#[derive(Clone, Debug)]
struct ViewLight {
    position: Vector4<f32>,
    direction: Option<Vector3<f32>>,
    cos_cutoff: f32,
    ambient: Vector4<f32>,
    diffuse: Vector4<f32>,
    attenuation: Vector3<f32>,
}

/// Collects one frame worth of lit vertices.
#[derive(Debug)]
pub struct FrameBuilder {
    projection: Matrix4<f32>,
    lights: Vec<ViewLight>,
    vertices: Vec<SceneVertex>,
    default_material: Material,
    pub shadow_colour: [f32; 4],
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self {
            projection: Matrix4::identity(),
            lights: Vec::new(),
            vertices: Vec::new(),
            default_material: Material::new("default"),
            shadow_colour: [0.65, 0.65, 0.65, 0.1],
        }
    }
}

impl FrameBuilder {
    pub fn new(shadow_colour: [f32; 4]) -> Self {
        Self {
            shadow_colour,
            ..Default::default()
        }
    }

    pub fn globals(&self) -> Globals {
        Globals::new(self.projection)
    }

    pub fn vertices(&self) -> &[SceneVertex] {
        &self.vertices
    }

    /// Forget the recorded frame.
    pub fn reset(&mut self) {
        self.lights.clear();
        self.vertices.clear();
    }

    fn shade(&self, material: &Material, position: Vector3<f32>, normal: Vector3<f32>) -> Vector4<f32> {
        let mut color = material.emission;
        for light in &self.lights {
            color += mul(material.ambient, light.ambient);

            let (to_light, factor) = if light.position.w == 0.0 {
                (light.position.truncate().normalize(), 1.0)
            } else {
                let delta = light.position.truncate() / light.position.w - position;
                let distance = delta.magnitude();
                let a = light.attenuation;
                let attenuation = 1.0 / (a.x + a.y * distance + a.z * distance * distance).max(f32::EPSILON);
                (delta.normalize(), attenuation)
            };
            if let Some(direction) = light.direction {
                if (-to_light).dot(direction) < light.cos_cutoff {
                    continue;
                }
            }
            let lambert = normal.dot(to_light).max(0.0);
            color += mul(material.diffuse, light.diffuse) * (lambert * factor);
        }
        color.w = material.diffuse.w;
        color.map(|c| c.clamp(0.0, 1.0))
    }
}

fn mul(a: Vector4<f32>, b: Vector4<f32>) -> Vector4<f32> {
    Vector4::new(a.x * b.x, a.y * b.y, a.z * b.z, a.w * b.w)
}

impl Renderer for FrameBuilder {
    fn load_projection(&mut self, projection: Matrix4<f32>) {
        self.projection = projection;
    }

    fn draw_light(&mut self, draw: LightDraw<'_>) {
        if draw.light.slot().is_none() {
            return;
        }
        let light = draw.light;
        let cutoff = light.cutoff();
        let direction = match light.kind() {
            LightKind::Spot { .. } if cutoff < OMNI_CUTOFF => light
                .direction()
                .map(|d| (draw.modelview * d.extend(0.0)).truncate().normalize()),
            _ => None,
        };
        self.lights.push(ViewLight {
            position: draw.modelview * light.position(),
            direction,
            cos_cutoff: cutoff.to_radians().cos(),
            ambient: light.ambient,
            diffuse: light.diffuse,
            attenuation: light.attenuation,
        });
    }

    fn draw_mesh(&mut self, draw: MeshDraw<'_>) {
        let mv = draw.modelview;
        let normal_matrix = Matrix3::from_cols(mv.x.truncate(), mv.y.truncate(), mv.z.truncate());
        let material = draw.material.unwrap_or(&self.default_material);

        let mut vertices = Vec::with_capacity(draw.mesh.indices.len());
        for face in draw.mesh.faces() {
            for vertex in face {
                vertices.push(self.vertex(vertex, mv, normal_matrix, material, draw.pass));
            }
        }
        self.vertices.append(&mut vertices);
    }
}

impl FrameBuilder {
    fn vertex(
        &self,
        vertex: &Vertex,
        mv: Matrix4<f32>,
        normal_matrix: Matrix3<f32>,
        material: &Material,
        pass: MeshPass,
    ) -> SceneVertex {
        let position = (mv * Vector3::from(vertex.position).extend(1.0)).truncate();
        let color = match pass {
            MeshPass::Shadow => Vector4::from(self.shadow_colour),
            MeshPass::Lit => {
                let normal = normal_matrix * Vector3::from(vertex.normal);
                let normal = if normal.is_zero() {
                    normal
                } else {
                    normal.normalize()
                };
                let color = self.shade(material, position, normal);
                match &material.texture {
                    Some(texture) => mul(color, texture.sample(vertex.tex_coords)),
                    None => color,
                }
            }
        };
        SceneVertex {
            position: position.into(),
            color: color.into(),
        }
    }
}

pub fn mk_scene_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    globals_bind_group_layout: &wgpu::BindGroupLayout,
    polygon_mode: wgpu::PolygonMode,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[globals_bind_group_layout],
        ..Default::default()
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        color_format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(crate::data_structures::texture::DepthTexture::DEPTH_FORMAT),
        &[SceneVertex::desc()],
        shader,
        polygon_mode,
    )
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
    polygon_mode: wgpu::PolygonMode,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // shadow geometry is flattened and may flip its winding
            cull_mode: None,
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
