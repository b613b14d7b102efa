//! Textures.
//!
//! This module provides [`Texture`], a decoded RGBA image attached to a
//! material, and [`DepthTexture`], the GPU depth buffer used by the window
//! context.

use anyhow::*;
use cgmath::Vector4;
use image::{ImageFormat, RgbaImage, load_from_memory_with_format};

use crate::object::Object;

/// A decoded image that materials can reference.
///
/// Sampling is nearest-neighbour with repeat wrapping; textures are looked up
/// per vertex by the presentation backend.
#[derive(Clone, Debug)]
pub struct Texture {
    object: Object,
    image: RgbaImage,
}

impl Texture {
    /// Decode a texture from raw image file contents.
    ///
    /// # Arguments
    ///
    /// * `bytes` represent raw image file data (PNG, JPEG, etc.)
    /// * `name` is the entity name of the texture
    /// * `format` is an optional file extension hint (e.g., "png"). If None, auto-detect.
    pub fn from_bytes(bytes: &[u8], name: &str, format: Option<&str>) -> Result<Self> {
        let img = match format {
            None => image::load_from_memory(bytes)?,
            Some(ext) => {
                let fmt = ImageFormat::from_extension(ext)
                    .ok_or_else(|| anyhow!("unknown image format '{ext}' for texture {name}"))?;
                load_from_memory_with_format(bytes, fmt)?
            }
        };
        Ok(Self::from_image(name, img.to_rgba8()))
    }

    pub fn from_image(name: &str, image: RgbaImage) -> Self {
        Self {
            object: Object::new(name),
            image,
        }
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut Object {
        &mut self.object
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Texel at `uv` as normalised RGBA.
    pub fn sample(&self, uv: [f32; 2]) -> Vector4<f32> {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return Vector4::new(1.0, 1.0, 1.0, 1.0);
        }
        let wrap = |t: f32, size: u32| {
            let t = t - t.floor();
            ((t * size as f32) as u32).min(size - 1)
        };
        let px = self.image.get_pixel(wrap(uv[0], w), wrap(uv[1], h));
        Vector4::new(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        )
    }
}

/// Depth buffer for the window surface.
#[derive(Debug)]
pub struct DepthTexture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// # Arguments
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
    pub fn new(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }
}
