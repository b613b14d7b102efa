//! Scene loading from glTF 2.0 files.
//!
//! [`load_scene_gltf`] reads a `.gltf`/`.glb` file (external buffers and data
//! URIs included) and rebuilds its default scene below a new root node:
//!
//! - node names, hierarchy and local matrices are kept as they are
//! - a mesh with a single triangle primitive becomes a mesh node, several
//!   primitives become a container with one mesh child per primitive
//! - materials map base colour to diffuse and the emissive factor to emission;
//!   the base colour texture is decoded into a [`Texture`]
//! - `KHR_lights_punctual` lights become omni, spot or infinite lights
//! - cameras become perspective or orthographic camera nodes
//!
//! Spot lights in glTF shine down -Z while engine spot lights shine down -Y,
//! so spot nodes get a -90° turn about X appended to their local matrix.

use std::path::Path;

use anyhow::Context as _;
use cgmath::{Deg, Matrix4, Rad, SquareMatrix, Vector4};
use gltf::khr_lights_punctual::Kind;
use image::RgbaImage;
use log::{debug, warn};

use crate::{
    camera::{Camera, RATIO_16_9},
    data_structures::{
        light::Light,
        material::{Material, MaterialId},
        mesh::{Mesh, Vertex},
        scene_graph::{NodeId, NodeKind, Scene},
        texture::Texture,
    },
};

/// Far plane used for glTF cameras without one.
pub const DEFAULT_FAR: f32 = 5000.0;

/// Load the glTF file at `path` into `scene` and return the new root node.
pub fn load_scene_gltf(scene: &mut Scene, path: impl AsRef<Path>) -> anyhow::Result<NodeId> {
    let path = path.as_ref();
    let (document, buffers, images) =
        gltf::import(path).with_context(|| format!("cannot load glTF scene {}", path.display()))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scene");
    Ok(build_scene(scene, name, &document, &buffers, &images))
}

/// Load a self-contained glTF (data URIs or GLB) from memory.
pub fn load_scene_gltf_slice(scene: &mut Scene, name: &str, bytes: &[u8]) -> anyhow::Result<NodeId> {
    let (document, buffers, images) =
        gltf::import_slice(bytes).with_context(|| format!("cannot parse glTF scene {name}"))?;
    Ok(build_scene(scene, name, &document, &buffers, &images))
}

fn build_scene(
    scene: &mut Scene,
    name: &str,
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> NodeId {
    let materials: Vec<MaterialId> = document
        .materials()
        .map(|material| scene.add_material(to_material(&material, images)))
        .collect();

    let root = scene.create_node(name, Matrix4::identity());
    let gltf_scene = document.default_scene().or_else(|| document.scenes().next());
    match gltf_scene {
        Some(gltf_scene) => {
            for node in gltf_scene.nodes() {
                let child = to_scene_node(scene, &node, buffers, &materials);
                scene.add_child(root, child);
            }
        }
        None => warn!("glTF scene {name} contains no scenes"),
    }
    debug!("Loaded glTF scene {name}: {} nodes", scene.len());
    root
}

fn to_scene_node(
    scene: &mut Scene,
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    materials: &[MaterialId],
) -> NodeId {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));
    let local = Matrix4::from(node.transform().matrix());

    let id = if let Some(mesh) = node.mesh() {
        let mut meshes: Vec<Mesh> = mesh
            .primitives()
            .filter_map(|p| to_mesh(&p, buffers, materials))
            .collect();
        if meshes.len() == 1 {
            scene.create_mesh(&name, local, meshes.remove(0))
        } else {
            let container = scene.create_node(&name, local);
            for (i, mesh) in meshes.into_iter().enumerate() {
                let part = scene.create_mesh(&format!("{name}_{i}"), Matrix4::identity(), mesh);
                scene.add_child(container, part);
            }
            container
        }
    } else if let Some(light) = node.light() {
        let (light, local) = to_light(&light, local);
        scene.insert(&name, local, NodeKind::Light(light))
    } else if let Some(camera) = node.camera() {
        scene.create_camera(&name, local, to_camera(&camera))
    } else {
        scene.create_node(&name, local)
    };

    for child in node.children() {
        let child = to_scene_node(scene, &child, buffers, materials);
        scene.add_child(id, child);
    }
    id
}

fn to_mesh(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    materials: &[MaterialId],
) -> Option<Mesh> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        warn!(
            "Skipping glTF primitive {} with unsupported mode {:?}",
            primitive.index(),
            primitive.mode()
        );
        return None;
    }
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

    let mut vertices: Vec<Vertex> = reader
        .read_positions()?
        .map(|position| Vertex {
            position,
            ..Default::default()
        })
        .collect();
    if let Some(normals) = reader.read_normals() {
        vertices
            .iter_mut()
            .zip(normals)
            .for_each(|(v, n)| v.normal = n);
    }
    if let Some(tex_coords) = reader.read_tex_coords(0).map(|t| t.into_f32()) {
        vertices
            .iter_mut()
            .zip(tex_coords)
            .for_each(|(v, t)| v.tex_coords = t);
    }
    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };

    let mut mesh = Mesh::new(vertices, indices);
    mesh.material = primitive
        .material()
        .index()
        .and_then(|i| materials.get(i).copied());
    Some(mesh)
}

fn to_material(material: &gltf::Material, images: &[gltf::image::Data]) -> Material {
    let name = material
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("material_{}", material.index().unwrap_or_default()));
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();
    let [er, eg, eb] = material.emissive_factor();

    let mut out = Material::new(name.as_str());
    out.diffuse = Vector4::new(r, g, b, a);
    out.ambient = Vector4::new(r * 0.2, g * 0.2, b * 0.2, a);
    out.emission = Vector4::new(er, eg, eb, 1.0);
    out.texture = pbr
        .base_color_texture()
        .and_then(|info| images.get(info.texture().source().index()))
        .and_then(|data| to_texture(&name, data));
    out
}

fn to_texture(name: &str, data: &gltf::image::Data) -> Option<Texture> {
    use gltf::image::Format;

    let pixels = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8 => data.pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        other => {
            warn!("Texture of {name} uses unsupported pixel format {other:?}");
            return None;
        }
    };
    let image = RgbaImage::from_raw(data.width, data.height, pixels)?;
    Some(Texture::from_image(name, image))
}

fn to_light(light: &gltf::khr_lights_punctual::Light, local: Matrix4<f32>) -> (Light, Matrix4<f32>) {
    let (mut out, local) = match light.kind() {
        Kind::Point => (Light::omni(), local),
        Kind::Directional => (Light::infinite(), local),
        Kind::Spot {
            outer_cone_angle, ..
        } => (
            Light::spot(Deg::from(Rad(outer_cone_angle)).0),
            local * Matrix4::from_angle_x(Deg(-90.0)),
        ),
    };
    let [r, g, b] = light.color().map(|c| (c * light.intensity()).min(1.0));
    out.diffuse = Vector4::new(r, g, b, 1.0);
    out.specular = Vector4::new(r, g, b, 1.0);
    out.ambient = Vector4::new(r * 0.2, g * 0.2, b * 0.2, 1.0);
    (out, local)
}

fn to_camera(camera: &gltf::Camera) -> Camera {
    match camera.projection() {
        gltf::camera::Projection::Perspective(p) => Camera::perspective(
            Deg::from(Rad(p.yfov())).0,
            p.aspect_ratio().unwrap_or(RATIO_16_9),
            p.znear(),
            p.zfar().unwrap_or(DEFAULT_FAR),
        ),
        gltf::camera::Projection::Orthographic(o) => {
            Camera::ortho_extent(o.xmag() * 2.0, o.ymag() * 2.0, o.znear(), o.zfar())
        }
    }
}
