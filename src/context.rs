//! Window and GPU context.
//!
//! [`Context`] owns the wgpu surface, device and queue of the window together
//! with the scene pipelines. It is a [`Renderer`]: the engine records a frame
//! into it, then [`Context::present`] uploads the assembled vertices and draws
//! them onto the surface.

use std::{iter, sync::Arc};

use cgmath::Matrix4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    data_structures::texture::DepthTexture,
    pipelines::basic::{FrameBuilder, SceneVertex, mk_scene_pipeline},
    render::{LightDraw, MeshDraw, Renderer},
};

const INITIAL_VERTEX_CAPACITY: u64 = 1 << 14;

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: DepthTexture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    fill_pipeline: wgpu::RenderPipeline,
    line_pipeline: Option<wgpu::RenderPipeline>,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    frame: FrameBuilder,
}

impl Context {
    pub async fn new(window: Arc<Window>, shadow_colour: [f32; 4]) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow::anyhow!("no suitable GPU adapter: {e}"))?;

        // wireframe needs line rasterisation, which not every adapter offers
        let required_features = adapter.features() & wgpu::Features::POLYGON_MODE_LINE;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("hanoi-ngin device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no texture formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let frame = FrameBuilder::new(shadow_colour);
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::cast_slice(&[frame.globals()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("globals_bind_group_layout"),
            });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
            label: Some("globals_bind_group"),
        });

        let fill_pipeline = mk_scene_pipeline(
            &device,
            config.format,
            &globals_bind_group_layout,
            wgpu::PolygonMode::Fill,
        );
        let line_pipeline = required_features
            .contains(wgpu::Features::POLYGON_MODE_LINE)
            .then(|| {
                mk_scene_pipeline(
                    &device,
                    config.format,
                    &globals_bind_group_layout,
                    wgpu::PolygonMode::Line,
                )
            });
        if line_pipeline.is_none() {
            log::warn!("Adapter lacks line rasterisation, wireframe mode is unavailable.");
        }

        let vertex_capacity = INITIAL_VERTEX_CAPACITY;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);
        let depth_texture = DepthTexture::new(&device, [config.width, config.height], "depth_texture");

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            globals_buffer,
            globals_bind_group,
            fill_pipeline,
            line_pipeline,
            vertex_buffer,
            vertex_capacity,
            frame,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = DepthTexture::new(&self.device, [width, height], "depth_texture");
        }
    }

    /// Draw the recorded frame and start recording the next one.
    pub fn present(&mut self, clear_colour: wgpu::Color, wireframe: bool) -> Result<(), wgpu::SurfaceError> {
        let vertex_count = self.frame.vertices().len() as u64;
        if vertex_count > self.vertex_capacity {
            self.vertex_capacity = vertex_count.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
        }
        if vertex_count > 0 {
            self.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(self.frame.vertices()),
            );
        }
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::cast_slice(&[self.frame.globals()]),
        );

        let output = self.surface.get_current_texture();
        let output = match output {
            Ok(output) => output,
            Err(e) => {
                self.frame.reset();
                return Err(e);
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if vertex_count > 0 {
                let pipeline = match (&self.line_pipeline, wireframe) {
                    (Some(line), true) => line,
                    _ => &self.fill_pipeline,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..vertex_count as u32, 0..1);
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        self.frame.reset();
        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: capacity * std::mem::size_of::<SceneVertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl Renderer for Context {
    fn load_projection(&mut self, projection: Matrix4<f32>) {
        self.frame.load_projection(projection);
    }

    fn draw_light(&mut self, draw: LightDraw<'_>) {
        self.frame.draw_light(draw);
    }

    fn draw_mesh(&mut self, draw: MeshDraw<'_>) {
        self.frame.draw_mesh(draw);
    }
}
