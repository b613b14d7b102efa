//! Scene graph and hierarchical scene organization.
//!
//! A [`Scene`] is an arena of [`Node`]s addressed by [`NodeId`]. Each node has
//! a local transform, at most one parent, an ordered list of children and a
//! [`NodeKind`] payload (nothing, a mesh, a light or a camera). The child order
//! is the traversal order of the render list.
//!
//! # Ownership
//!
//! A parent owns its subtree: [`Scene::destroy`] removes a node together with
//! every descendant. A child that was detached with [`Scene::remove_child`]
//! becomes a free root and survives the destruction of its former parent.
//! Handles of destroyed nodes are never reused, so every lookup with a stale
//! [`NodeId`] reports "not found".
//!
//! # World matrices
//!
//! World matrices only inherit the *translation* of the parent:
//!
//! ```text
//! world(root)  = local(root)
//! world(child) = translation(world(parent)) * local(child)
//! ```
//!
//! Rotation and scale of ancestors do not propagate. The Hanoi client relies
//! on this: a disk parented to a spinning light keeps its own orientation.
//!
//! # Movement
//!
//! Nodes can be scripted with [`Scene::move_by`]. Each [`Scene::calculate_move`]
//! advances the node's queue by one tick (see [`Movement`]).

use cgmath::Matrix4;
use log::{debug, warn};
use slotmap::SlotMap;

use crate::{
    camera::Camera,
    data_structures::{
        light::{Light, LightSlots},
        material::{Material, MaterialId},
        mesh::Mesh,
        movement::Movement,
    },
    object::Object,
};

slotmap::new_key_type! {
    /// Handle of a node stored in a [`Scene`].
    pub struct NodeId;
}

/// What a node carries besides its transform.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Plain container node.
    Empty,
    Mesh(Mesh),
    Light(Light),
    Camera(Camera),
}

#[derive(Clone, Debug)]
pub struct Node {
    object: Object,
    local: Matrix4<f32>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    movement: Movement,
    pub kind: NodeKind,
}

impl Node {
    fn new(name: &str, local: Matrix4<f32>, kind: NodeKind) -> Self {
        Self {
            object: Object::new(name),
            local,
            parent: None,
            children: Vec::new(),
            movement: Movement::new(local),
            kind,
        }
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn name(&self) -> &str {
        self.object.name()
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.local
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    materials: SlotMap<MaterialId, Material>,
    lights: LightSlots,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene whose lights share `capacity` light slots.
    pub fn with_light_capacity(capacity: usize) -> Self {
        Self {
            lights: LightSlots::with_capacity(capacity),
            ..Default::default()
        }
    }

    pub fn insert(&mut self, name: &str, local: Matrix4<f32>, mut kind: NodeKind) -> NodeId {
        if let NodeKind::Light(light) = &mut kind {
            light.slot = self.lights.acquire();
        }
        self.nodes.insert(Node::new(name, local, kind))
    }

    pub fn create_node(&mut self, name: &str, local: Matrix4<f32>) -> NodeId {
        self.insert(name, local, NodeKind::Empty)
    }

    pub fn create_mesh(&mut self, name: &str, local: Matrix4<f32>, mesh: Mesh) -> NodeId {
        self.insert(name, local, NodeKind::Mesh(mesh))
    }

    pub fn create_light(&mut self, name: &str, local: Matrix4<f32>, light: Light) -> NodeId {
        self.insert(name, local, NodeKind::Light(light))
    }

    pub fn create_camera(&mut self, name: &str, local: Matrix4<f32>, camera: Camera) -> NodeId {
        self.insert(name, local, NodeKind::Camera(camera))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's payload.
    pub fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.nodes.get_mut(id).map(|n| &mut n.kind)
    }

    pub fn camera_mut(&mut self, id: NodeId) -> Option<&mut Camera> {
        self.nodes.get_mut(id).and_then(Node::as_camera_mut)
    }

    pub fn light_mut(&mut self, id: NodeId) -> Option<&mut Light> {
        match self.kind_mut(id)? {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(Node::name)
    }

    pub fn set_name(&mut self, id: NodeId, name: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.object.set_name(name);
                true
            }
            None => false,
        }
    }

    // hierarchy

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).get(index).copied()
    }

    /// Find a descendant of `parent` by name.
    ///
    /// Direct children are checked first, then each child's subtree in child
    /// order.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let children = self.children(parent);
        children
            .iter()
            .copied()
            .find(|&c| self.name(c) == Some(name))
            .or_else(|| children.iter().find_map(|&c| self.find_child(c, name)))
    }

    /// Is `ancestor` equal to `id` or above it in the hierarchy?
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Attach `child` to `parent`, detaching it from its previous parent first.
    ///
    /// Fails for unknown ids, for a node that is already a direct child of
    /// `parent` and for attachments that would create a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) {
            warn!("add_child: unknown node {parent:?} or {child:?}");
            return false;
        }
        if self.children(parent).contains(&child) {
            warn!(
                "add_child: {} is already a child of {}",
                self.nodes[child].object, self.nodes[parent].object
            );
            return false;
        }
        if self.is_ancestor(child, parent) {
            warn!(
                "add_child: attaching {} below {} would create a cycle",
                self.nodes[child].object, self.nodes[parent].object
            );
            return false;
        }
        if let Some(old) = self.nodes[child].parent {
            if let Some(old) = self.nodes.get_mut(old) {
                old.children.retain(|&c| c != child);
            }
        }
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        true
    }

    /// Detach the child at `index`. The detached node stays in the scene as a free root.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> bool {
        let Some(node) = self.nodes.get_mut(parent) else {
            return false;
        };
        if index >= node.children.len() {
            debug!(
                "remove_child_at: index {index} out of bounds for {} ({} children)",
                node.object,
                node.children.len()
            );
            return false;
        }
        let child = node.children.remove(index);
        if let Some(child) = self.nodes.get_mut(child) {
            if child.parent == Some(parent) {
                child.parent = None;
            }
        }
        true
    }

    /// Detach `child` from `parent`. Fails if it is not a direct child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.children(parent).iter().position(|&c| c == child) {
            Some(index) => self.remove_child_at(parent, index),
            None => {
                debug!("remove_child: {child:?} is not a child of {parent:?}");
                false
            }
        }
    }

    /// Remove `id` and its whole subtree from the scene.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            if let NodeKind::Light(light) = &node.kind {
                if let Some(slot) = light.slot {
                    self.lights.release(slot);
                }
            }
            stack.extend(node.children);
        }
        true
    }

    // transforms

    pub fn matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        self.nodes.get(id).map(|n| n.local)
    }

    pub fn set_matrix(&mut self, id: NodeId, local: Matrix4<f32>) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.local = local;
                true
            }
            None => false,
        }
    }

    /// World matrix of `id`: the parent's world translation followed by the local transform.
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let node = self.nodes.get(id)?;
        let world = match node.parent.and_then(|p| self.world_matrix(p)) {
            Some(parent) => Matrix4::from_translation(parent.w.truncate()) * node.local,
            None => node.local,
        };
        Some(world)
    }

    // movement

    /// Queue `step` to be applied `count` more ticks, forever if `count` is negative.
    pub fn move_by(&mut self, id: NodeId, step: Matrix4<f32>, count: i32) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.movement.push(step, count);
                true
            }
            None => false,
        }
    }

    /// Advance the movement of `id` by one tick.
    pub fn calculate_move(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.local = node.movement.tick(node.local);
        }
    }

    pub fn is_moving(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.movement.is_moving())
    }

    /// Pause the movement of `id`, keeping its queue.
    pub fn stop_move(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.movement.stop();
        }
    }

    pub fn resume_move(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.movement.resume();
        }
    }

    /// Drop every queued step of `id`.
    pub fn reset_move(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.movement.reset();
        }
    }

    /// Run the finite movement of `id` to completion.
    pub fn finish_move(&mut self, id: NodeId) {
        while self.is_moving(id) {
            self.calculate_move(id);
        }
    }

    pub fn destination(&self, id: NodeId) -> Option<Matrix4<f32>> {
        self.nodes.get(id).map(|n| n.movement.destination())
    }

    // materials

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.insert(material)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn find_material(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .find_map(|(id, m)| (m.name() == name).then_some(id))
    }

    /// Material handle of a mesh node.
    pub fn mesh_material(&self, id: NodeId) -> Option<MaterialId> {
        self.nodes.get(id)?.as_mesh()?.material
    }

    /// Swap the material of a mesh node. Fails for anything but a mesh.
    pub fn set_mesh_material(&mut self, id: NodeId, material: Option<MaterialId>) -> bool {
        match self.kind_mut(id) {
            Some(NodeKind::Mesh(mesh)) => {
                mesh.material = material;
                true
            }
            _ => false,
        }
    }

    pub fn light_slots(&self) -> &LightSlots {
        &self.lights
    }
}
