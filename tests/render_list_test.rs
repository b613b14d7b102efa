use hanoi_ngin::{
    Deg, Matrix4, SquareMatrix, Vector3, Vector4,
    data_structures::{light::Light, mesh::Mesh},
    render::{CommandRecorder, DrawCommand, MeshPass, RenderList, shadow_matrix},
};

use crate::common::test_utils::{assert_matrix_eq, assert_vector_eq, engine_with_camera, translation};

mod common;

#[test]
fn render_without_camera_fails_and_draws_nothing() {
    let (mut engine, root, _) = engine_with_camera();
    let scene = engine.scene_mut();
    let cube = scene.create_mesh("cube", Matrix4::identity(), Mesh::cuboid(1.0, 1.0, 1.0));
    scene.add_child(root, cube);

    let mut list = RenderList::new();
    list.pass(scene, root, Matrix4::identity());
    let mut recorder = CommandRecorder::new();
    assert!(!list.render(scene, &mut recorder));
    assert!(recorder.commands.is_empty());
}

#[test]
fn set_camera_rejects_other_nodes() {
    let (mut engine, root, camera) = engine_with_camera();
    let mut list = RenderList::new();
    assert!(!list.set_camera(engine.scene(), root));
    assert_eq!(list.camera(), None);
    assert!(list.set_camera(engine.scene(), camera));
    assert!(!engine.set_active_camera(root));
    assert_eq!(engine.active_camera(), Some(camera));
}

#[test]
fn lights_are_drawn_before_meshes() {
    let (mut engine, root, camera) = engine_with_camera();
    let scene = engine.scene_mut();
    let a = scene.create_mesh("a", Matrix4::identity(), Mesh::cuboid(1.0, 1.0, 1.0));
    let l1 = scene.create_light("l1", translation(0.0, 5.0, 0.0), Light::omni());
    let b = scene.create_mesh("b", translation(2.0, 0.0, 0.0), Mesh::cuboid(1.0, 1.0, 1.0));
    let l2 = scene.create_light("l2", translation(0.0, 6.0, 0.0), Light::omni());
    for id in [a, l1, b, l2] {
        scene.add_child(root, id);
    }

    let mut list = RenderList::new();
    list.set_shadow_plane(None);
    assert!(list.set_camera(scene, camera));
    list.pass(scene, root, Matrix4::identity());
    assert_eq!(list.len(), 4);
    assert_eq!(list.lights().len(), 2);
    assert_eq!(list.meshes().len(), 2);

    let order: Vec<_> = list.instances().map(|i| i.node).collect();
    assert_eq!(order, vec![l2, l1, a, b]);

    let mut recorder = CommandRecorder::new();
    assert!(list.render(scene, &mut recorder));
    assert!(matches!(recorder.commands[0], DrawCommand::Projection(_)));
    assert_eq!(recorder.drawn_names(), vec!["l2", "l1", "a", "b"]);
    assert_eq!(recorder.shadow_count(), 0);

    list.clear();
    assert!(list.is_empty());
    assert!(list.lights().is_empty());
    assert!(list.meshes().is_empty());
}

#[test]
fn camera_and_empty_nodes_are_not_collected() {
    let (mut engine, root, _) = engine_with_camera();
    let scene = engine.scene_mut();
    let group = scene.create_node("group", Matrix4::identity());
    let cube = scene.create_mesh("cube", Matrix4::identity(), Mesh::cuboid(1.0, 1.0, 1.0));
    scene.add_child(root, group);
    scene.add_child(group, cube);

    let mut list = RenderList::new();
    list.pass(scene, root, Matrix4::identity());
    let order: Vec<_> = list.instances().map(|i| i.node).collect();
    assert_eq!(order, vec![cube]);
}

#[test]
fn modelview_is_view_times_world() {
    let (mut engine, root, _) = engine_with_camera();
    let scene = engine.scene_mut();
    let cube = scene.create_mesh("cube", translation(1.0, 0.0, 0.0), Mesh::cuboid(1.0, 1.0, 1.0));
    scene.add_child(root, cube);

    let mut recorder = CommandRecorder::new();
    assert!(engine.frame(&mut recorder));
    let modelview = recorder
        .commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::Mesh {
                modelview,
                pass: MeshPass::Lit,
                ..
            } => Some(*modelview),
            _ => None,
        })
        .unwrap();
    assert_matrix_eq(modelview, translation(1.0, 0.0, -5.0));
}

#[test]
fn every_mesh_casts_one_shadow_from_the_first_light() {
    let (mut engine, root, _) = engine_with_camera();
    let scene = engine.scene_mut();
    let lamp = scene.create_light("lamp", translation(0.0, 10.0, 0.0), Light::omni());
    let a = scene.create_mesh("a", translation(0.0, 1.0, 0.0), Mesh::cuboid(1.0, 1.0, 1.0));
    let b = scene.create_mesh("b", translation(3.0, 1.0, 0.0), Mesh::cuboid(1.0, 1.0, 1.0));
    for id in [lamp, a, b] {
        scene.add_child(root, id);
    }

    let mut recorder = CommandRecorder::new();
    assert!(engine.frame(&mut recorder));
    assert_eq!(recorder.shadow_count(), 2);
    let first_shadow = recorder.commands.iter().position(|c| {
        matches!(
            c,
            DrawCommand::Mesh {
                pass: MeshPass::Shadow,
                ..
            }
        )
    });
    let first_light = recorder
        .commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Light { .. }));
    assert!(first_shadow < first_light);
}

#[test]
fn no_shadows_without_lights() {
    let (mut engine, root, _) = engine_with_camera();
    let scene = engine.scene_mut();
    let cube = scene.create_mesh("cube", Matrix4::identity(), Mesh::cuboid(1.0, 1.0, 1.0));
    scene.add_child(root, cube);

    let mut recorder = CommandRecorder::new();
    assert!(engine.frame(&mut recorder));
    assert_eq!(recorder.shadow_count(), 0);
    assert_eq!(recorder.drawn_names(), vec!["cube"]);
}

#[test]
fn shadow_matrix_projects_onto_the_plane() {
    let light = Vector4::new(0.0, 10.0, 0.0, 1.0);
    let ground = Vector4::new(0.0, 1.0, 0.0, 0.0);
    let m = shadow_matrix(light, ground);

    let p = m * Vector4::new(1.0, 5.0, 0.0, 1.0);
    assert_vector_eq(p.truncate() / p.w, Vector3::new(2.0, 0.0, 0.0));

    let on_plane = m * Vector4::new(-3.0, 0.0, 4.0, 1.0);
    assert_vector_eq(on_plane.truncate() / on_plane.w, Vector3::new(-3.0, 0.0, 4.0));
}

#[test]
fn pass_ticks_movement_once_per_frame() {
    let (mut engine, root, _) = engine_with_camera();
    let scene = engine.scene_mut();
    let cube = scene.create_mesh("cube", Matrix4::identity(), Mesh::cuboid(1.0, 1.0, 1.0));
    scene.add_child(root, cube);
    scene.move_by(cube, translation(0.0, 1.0, 0.0), 3);

    let mut recorder = CommandRecorder::new();
    engine.frame(&mut recorder);
    engine.frame(&mut recorder);
    assert_matrix_eq(engine.scene().matrix(cube).unwrap(), translation(0.0, 2.0, 0.0));
    assert!(engine.scene().is_moving(cube));
    assert!(engine.render_list().is_empty());
}

#[test]
fn instances_use_the_translation_only_world_matrix() {
    let (mut engine, root, _) = engine_with_camera();
    let scene = engine.scene_mut();
    let arm = scene.create_node(
        "arm",
        translation(2.0, 0.0, 0.0) * Matrix4::from_angle_z(Deg(90.0)),
    );
    let hand = scene.create_mesh("hand", translation(1.0, 0.0, 0.0), Mesh::cuboid(1.0, 1.0, 1.0));
    scene.add_child(root, arm);
    scene.add_child(arm, hand);

    let mut list = RenderList::new();
    list.pass(scene, root, Matrix4::identity());
    assert_eq!(list.meshes().len(), 1);
    assert_matrix_eq(list.meshes()[0].world, translation(3.0, 0.0, 0.0));
}
