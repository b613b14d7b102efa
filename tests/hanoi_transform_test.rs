use approx::assert_abs_diff_eq;
use hanoi_ngin::{
    Deg, Matrix4, Scene, SquareMatrix, Vector3,
    hanoi::transform::{
        decompose, reattach, remove_rotation, remove_scaling, remove_translation, without_rotation,
        without_scaling, without_translation,
    },
};

use crate::common::test_utils::{assert_matrix_eq, assert_vector_eq, translation};

mod common;

fn trs() -> Matrix4<f32> {
    translation(1.0, 2.0, 3.0) * Matrix4::from_angle_y(Deg(30.0)) * Matrix4::from_scale(2.0)
}

#[test]
fn decompose_splits_translation_rotation_and_scale() {
    let parts = decompose(trs());
    assert_vector_eq(parts.translation, Vector3::new(1.0, 2.0, 3.0));
    assert_vector_eq(parts.scale, Vector3::new(2.0, 2.0, 2.0));
    assert_matrix_eq(
        Matrix4::from(parts.rotation),
        Matrix4::from_angle_y(Deg(30.0)),
    );
}

#[test]
fn components_can_be_stripped_one_by_one() {
    assert_matrix_eq(
        without_translation(trs()),
        Matrix4::from_angle_y(Deg(30.0)) * Matrix4::from_scale(2.0),
    );
    assert_matrix_eq(
        without_rotation(trs()),
        translation(1.0, 2.0, 3.0) * Matrix4::from_scale(2.0),
    );
    let unscaled = without_scaling(trs());
    assert_vector_eq(decompose(unscaled).scale, Vector3::new(1.0, 1.0, 1.0));
    assert_matrix_eq(without_scaling(Matrix4::from_scale(0.0)), Matrix4::from_scale(0.0));
}

#[test]
fn node_helpers_rewrite_the_local_matrix() {
    let mut scene = Scene::new();
    let node = scene.create_node("node", trs());
    remove_rotation(&mut scene, node);
    remove_scaling(&mut scene, node);
    remove_translation(&mut scene, node);
    assert_matrix_eq(scene.matrix(node).unwrap(), Matrix4::identity());
}

#[test]
fn reattach_keeps_the_world_position() {
    let mut scene = Scene::new();
    let a = scene.create_node("a", translation(-2.0, 0.0, 0.0));
    let b = scene.create_node("b", translation(3.0, 1.0, 0.0));
    let node = scene.create_node("node", translation(0.0, 4.0, 0.0) * Matrix4::from_angle_x(Deg(20.0)));
    scene.add_child(a, node);
    let before = scene.world_matrix(node).unwrap();

    assert!(reattach(&mut scene, node, b, false));
    assert_eq!(scene.parent(node), Some(b));
    assert_matrix_eq(scene.world_matrix(node).unwrap(), before);
}

#[test]
fn reattach_with_stripped_translation_keeps_the_world_position() {
    let mut scene = Scene::new();
    let a = scene.create_node("a", translation(-2.0, 0.0, 0.0));
    let b = scene.create_node("b", translation(3.0, 1.0, 0.0));
    let node = scene.create_node("node", translation(0.5, 4.0, 0.0));
    scene.add_child(a, node);

    assert!(reattach(&mut scene, node, b, true));
    let world = scene.world_matrix(node).unwrap().w.truncate();
    assert_vector_eq(world, Vector3::new(-1.5, 4.0, 0.0));
    let local = scene.matrix(node).unwrap().w.truncate();
    assert_abs_diff_eq!(local.x, -4.5, epsilon = 1e-4);
}
