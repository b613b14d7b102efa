//! Surface materials.

use cgmath::Vector4;

use crate::{data_structures::texture::Texture, object::Object};

slotmap::new_key_type! {
    /// Handle of a material stored in a [`Scene`](crate::data_structures::scene_graph::Scene).
    pub struct MaterialId;
}

/// Fixed-function material: emission, ambient, diffuse and specular colours,
/// a shininess exponent and an optional texture.
#[derive(Clone, Debug)]
pub struct Material {
    object: Object,
    pub emission: Vector4<f32>,
    pub ambient: Vector4<f32>,
    pub diffuse: Vector4<f32>,
    pub specular: Vector4<f32>,
    pub shininess: f32,
    pub texture: Option<Texture>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            object: Object::new(name),
            emission: Vector4::new(0.0, 0.0, 0.0, 1.0),
            ambient: Vector4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vector4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vector4::new(0.5, 0.5, 0.5, 1.0),
            shininess: 128.0,
            texture: None,
        }
    }

    pub fn with_colors(
        name: impl Into<String>,
        emission: Vector4<f32>,
        ambient: Vector4<f32>,
        diffuse: Vector4<f32>,
    ) -> Self {
        Self {
            emission,
            ambient,
            diffuse,
            ..Self::new(name)
        }
    }

    /// Plain coloured material: diffuse `color`, ambient a fifth of it.
    pub fn solid(name: impl Into<String>, color: Vector4<f32>) -> Self {
        let ambient = Vector4::new(color.x * 0.2, color.y * 0.2, color.z * 0.2, color.w);
        Self::with_colors(name, Vector4::new(0.0, 0.0, 0.0, 1.0), ambient, color)
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut Object {
        &mut self.object
    }

    pub fn name(&self) -> &str {
        self.object.name()
    }
}
