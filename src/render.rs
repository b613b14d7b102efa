//! Render list and draw sinks.
//!
//! Every frame the engine flattens the scene graph into a [`RenderList`] and
//! replays it through a [`Renderer`]:
//!
//! 1. [`RenderList::pass`] walks the tree in pre-order, advances each node's
//!    scripted movement by one tick and buckets lights and meshes together with
//!    their world matrices. Lights are put in front of the master list so they
//!    are set up before any mesh is drawn.
//! 2. [`RenderList::render`] loads the active camera's projection, draws the
//!    planar shadows of all meshes cast by the first light and finally draws
//!    the master list in order with `view * world` as the model-view matrix.
//! 3. [`RenderList::clear`] empties the buckets for the next frame.
//!
//! # Key types
//!
//! - [`Renderer`] is the draw sink. The window [`Context`](crate::context::Context)
//!   implements it for the GPU, [`CommandRecorder`] records frames as plain data
//! - [`MeshDraw`] and [`LightDraw`] describe a single draw
//! - [`Instance`] is a node paired with its world matrix for the current frame
//!

use std::collections::VecDeque;

use cgmath::{Matrix4, Vector3, Vector4};
use log::error;

use crate::{
    camera::Camera,
    data_structures::{
        light::{Light, LightSlot},
        material::Material,
        mesh::Mesh,
        scene_graph::{NodeId, NodeKind, Scene},
    },
};

/// Height of projected shadows above their plane.
pub const SHADOW_OFFSET: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshPass {
    /// Regular lit draw.
    Lit,
    /// Flattened onto the shadow plane, drawn in the shadow colour.
    Shadow,
}

pub struct MeshDraw<'a> {
    pub name: &'a str,
    pub mesh: &'a Mesh,
    pub material: Option<&'a Material>,
    pub modelview: Matrix4<f32>,
    pub pass: MeshPass,
}

pub struct LightDraw<'a> {
    pub name: &'a str,
    pub light: &'a Light,
    pub modelview: Matrix4<f32>,
}

/// Sink for the draws of one frame.
pub trait Renderer {
    fn load_projection(&mut self, projection: Matrix4<f32>);

    fn draw_light(&mut self, draw: LightDraw<'_>);

    fn draw_mesh(&mut self, draw: MeshDraw<'_>);
}

/// A recorded draw.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Projection(Matrix4<f32>),
    Light {
        name: String,
        slot: Option<LightSlot>,
        modelview: Matrix4<f32>,
    },
    Mesh {
        name: String,
        faces: usize,
        material: Option<String>,
        modelview: Matrix4<f32>,
        pass: MeshPass,
    },
}

/// [`Renderer`] that keeps every draw as a [`DrawCommand`].
#[derive(Clone, Debug, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Names of the drawn nodes in draw order, shadows excluded.
    pub fn drawn_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Light { name, .. } => Some(name.as_str()),
                DrawCommand::Mesh {
                    name,
                    pass: MeshPass::Lit,
                    ..
                } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn shadow_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::Mesh {
                        pass: MeshPass::Shadow,
                        ..
                    }
                )
            })
            .count()
    }
}

impl Renderer for CommandRecorder {
    fn load_projection(&mut self, projection: Matrix4<f32>) {
        self.commands.push(DrawCommand::Projection(projection));
    }

    fn draw_light(&mut self, draw: LightDraw<'_>) {
        self.commands.push(DrawCommand::Light {
            name: draw.name.to_string(),
            slot: draw.light.slot(),
            modelview: draw.modelview,
        });
    }

    fn draw_mesh(&mut self, draw: MeshDraw<'_>) {
        self.commands.push(DrawCommand::Mesh {
            name: draw.name.to_string(),
            faces: draw.mesh.face_count(),
            material: draw.material.map(|m| m.name().to_string()),
            modelview: draw.modelview,
            pass: draw.pass,
        });
    }
}

/// A node and its world matrix for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub node: NodeId,
    pub world: Matrix4<f32>,
}

#[derive(Debug)]
pub struct RenderList {
    all: VecDeque<Instance>,
    lights: Vec<Instance>,
    meshes: Vec<Instance>,
    camera: Option<NodeId>,
    shadow_plane: Option<Vector4<f32>>,
}

impl Default for RenderList {
    fn default() -> Self {
        Self {
            all: VecDeque::new(),
            lights: Vec::new(),
            meshes: Vec::new(),
            camera: None,
            shadow_plane: Some(Vector4::new(0.0, 1.0, 0.0, 0.0)),
        }
    }
}

impl RenderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plane `(a, b, c, d)` with `ax + by + cz + d = 0` that receives shadows; `None` disables them.
    pub fn set_shadow_plane(&mut self, plane: Option<Vector4<f32>>) {
        self.shadow_plane = plane;
    }

    pub fn shadow_plane(&self) -> Option<Vector4<f32>> {
        self.shadow_plane
    }

    /// Use `camera` for the following renders. Fails if it is not a camera node.
    pub fn set_camera(&mut self, scene: &Scene, camera: NodeId) -> bool {
        match scene.get(camera).and_then(|n| n.as_camera()) {
            Some(_) => {
                self.camera = Some(camera);
                true
            }
            None => {
                error!("set_camera: {camera:?} is not a camera node");
                false
            }
        }
    }

    pub fn camera(&self) -> Option<NodeId> {
        self.camera
    }

    /// Collect the subtree of `root`, ticking every node's movement once.
    ///
    /// `matrix` is the accumulated transform of `root`'s parent.
    pub fn pass(&mut self, scene: &mut Scene, root: NodeId, matrix: Matrix4<f32>) {
        let Some(local) = scene.matrix(root) else {
            return;
        };
        // full pre-tick transform handed down the tree; instances store the
        // translation-only world matrix instead
        let matrix = matrix * local;

        scene.calculate_move(root);
        let Some(world) = scene.world_matrix(root) else {
            return;
        };
        let instance = Instance { node: root, world };
        match scene.get(root).map(|n| &n.kind) {
            Some(NodeKind::Light(_)) => {
                self.all.push_front(instance);
                self.lights.push(instance);
            }
            Some(NodeKind::Mesh(_)) => {
                self.all.push_back(instance);
                self.meshes.push(instance);
            }
            _ => {}
        }

        let children = scene.children(root).to_vec();
        for child in children {
            self.pass(scene, child, matrix);
        }
    }

    /// Draw the collected nodes through the active camera.
    pub fn render(&self, scene: &Scene, renderer: &mut dyn Renderer) -> bool {
        let Some(camera_id) = self.camera else {
            error!("render: no active camera");
            return false;
        };
        let (Some(camera), Some(eye)) = (
            scene.get(camera_id).and_then(|n| n.as_camera()),
            scene.world_matrix(camera_id),
        ) else {
            error!("render: active camera {camera_id:?} is gone");
            return false;
        };
        let view = Camera::view_matrix(eye);
        renderer.load_projection(camera.projection_matrix());

        if let (Some(plane), Some(light)) = (self.shadow_plane, self.lights.first()) {
            let shadow = shadow_matrix(light.world.w, plane);
            let lift = Matrix4::from_translation(Vector3::new(plane.x, plane.y, plane.z) * SHADOW_OFFSET);
            for mesh in &self.meshes {
                render_node(
                    scene,
                    mesh.node,
                    view * lift * shadow * mesh.world,
                    MeshPass::Shadow,
                    renderer,
                );
            }
        }

        for instance in &self.all {
            render_node(
                scene,
                instance.node,
                view * instance.world,
                MeshPass::Lit,
                renderer,
            );
        }
        true
    }

    pub fn clear(&mut self) {
        self.all.clear();
        self.lights.clear();
        self.meshes.clear();
    }

    /// Every collected instance, lights first.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.all.iter()
    }

    pub fn lights(&self) -> &[Instance] {
        &self.lights
    }

    pub fn meshes(&self) -> &[Instance] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

fn render_node(
    scene: &Scene,
    id: NodeId,
    modelview: Matrix4<f32>,
    pass: MeshPass,
    renderer: &mut dyn Renderer,
) {
    let Some(node) = scene.get(id) else {
        return;
    };
    match &node.kind {
        NodeKind::Mesh(mesh) => renderer.draw_mesh(MeshDraw {
            name: node.name(),
            mesh,
            material: mesh.material.and_then(|m| scene.material(m)),
            modelview,
            pass,
        }),
        NodeKind::Light(light) if pass == MeshPass::Lit => renderer.draw_light(LightDraw {
            name: node.name(),
            light,
            modelview,
        }),
        _ => {}
    }
}

/// Matrix that flattens geometry onto `plane` as seen from `light`.
///
/// `light` is homogeneous: `w == 1` for a point light, `w == 0` for a
/// direction. `plane` holds `(a, b, c, d)` of `ax + by + cz + d = 0`.
pub fn shadow_matrix(light: Vector4<f32>, plane: Vector4<f32>) -> Matrix4<f32> {
    let dot = plane.x * light.x + plane.y * light.y + plane.z * light.z + plane.w * light.w;
    let column = |axis: Vector4<f32>, p: f32| axis * dot - light * p;
    Matrix4::from_cols(
        column(Vector4::unit_x(), plane.x),
        column(Vector4::unit_y(), plane.y),
        column(Vector4::unit_z(), plane.z),
        column(Vector4::unit_w(), plane.w),
    )
}
