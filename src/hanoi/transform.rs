//! Matrix surgery on node transforms.
//!
//! The game moves disks between parents whose world matrices only share
//! translation, so it regularly needs to strip one component off a local
//! matrix or reattach a node without making it jump.

use cgmath::{InnerSpace, Matrix3, Matrix4, Quaternion, SquareMatrix, Vector3};

use crate::data_structures::scene_graph::{NodeId, Scene};

/// Translation, rotation and scale of an affine matrix without shear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposed {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

pub fn decompose(m: Matrix4<f32>) -> Decomposed {
    let axes = [m.x.truncate(), m.y.truncate(), m.z.truncate()];
    let scale = Vector3::new(axes[0].magnitude(), axes[1].magnitude(), axes[2].magnitude());
    let unit = |axis: Vector3<f32>, s: f32| if s > f32::EPSILON { axis / s } else { axis };
    let rotation = Matrix3::from_cols(
        unit(axes[0], scale.x),
        unit(axes[1], scale.y),
        unit(axes[2], scale.z),
    );
    Decomposed {
        translation: m.w.truncate(),
        rotation: Quaternion::from(rotation).normalize(),
        scale,
    }
}

pub fn without_scaling(m: Matrix4<f32>) -> Matrix4<f32> {
    let s = decompose(m).scale;
    if s.x <= f32::EPSILON || s.y <= f32::EPSILON || s.z <= f32::EPSILON {
        return m;
    }
    Matrix4::from_nonuniform_scale(1.0 / s.x, 1.0 / s.y, 1.0 / s.z) * m
}

pub fn without_translation(m: Matrix4<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(-decompose(m).translation) * m
}

pub fn without_rotation(m: Matrix4<f32>) -> Matrix4<f32> {
    m * Matrix4::from(decompose(m).rotation.conjugate())
}

fn update(scene: &mut Scene, node: NodeId, f: impl FnOnce(Matrix4<f32>) -> Matrix4<f32>) {
    if let Some(local) = scene.matrix(node) {
        scene.set_matrix(node, f(local));
    }
}

pub fn remove_scaling(scene: &mut Scene, node: NodeId) {
    update(scene, node, without_scaling);
}

pub fn remove_translation(scene: &mut Scene, node: NodeId) {
    update(scene, node, without_translation);
}

pub fn remove_rotation(scene: &mut Scene, node: NodeId) {
    update(scene, node, without_rotation);
}

/// Move `node` below `parent` while keeping its world matrix.
///
/// With `strip_translation` the local translation is dropped before the world
/// matrix is restored, so the node ends up with a clean offset relative to
/// its new parent.
pub fn reattach(scene: &mut Scene, node: NodeId, parent: NodeId, strip_translation: bool) -> bool {
    let Some(previous) = scene.world_matrix(node) else {
        return false;
    };
    if scene.parent(node) != Some(parent) && !scene.add_child(parent, node) {
        return false;
    }
    if strip_translation {
        remove_translation(scene, node);
    }
    let (Some(world), Some(local)) = (scene.world_matrix(node), scene.matrix(node)) else {
        return false;
    };
    let delta = previous.invert().map(|inv| inv * world);
    if let Some(undo) = delta.and_then(|d| d.invert()) {
        scene.set_matrix(node, local * undo);
    }
    true
}
