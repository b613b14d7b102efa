use hanoi_ngin::{
    Engine, EngineConfig, Matrix4, SquareMatrix,
    camera::{Camera, Projection},
    data_structures::{light::Light, material::Material, mesh::Mesh},
    engine::FpsCounter,
    pipelines::basic::FrameBuilder,
    render::{CommandRecorder, Renderer},
};
use instant::{Duration, Instant};

use crate::common::test_utils::{engine_with_camera, translation};

mod common;

#[test]
fn frame_without_root_renders_nothing() {
    let mut engine = Engine::new(EngineConfig::default());
    let mut recorder = CommandRecorder::new();
    assert!(!engine.frame(&mut recorder));
    assert!(recorder.commands.is_empty());
}

#[test]
fn frame_without_camera_fails() {
    let mut engine = Engine::new(EngineConfig::default());
    let root = engine.scene_mut().create_node("root", Matrix4::identity());
    engine.set_root(root);
    assert!(!engine.frame(&mut CommandRecorder::new()));
}

#[test]
fn active_camera_follows_the_viewport() {
    let (mut engine, _, camera) = engine_with_camera();
    engine.resize(400, 0);
    assert_eq!(engine.viewport(), (400, 1));

    engine.resize(1200, 600);
    match engine.scene().get(camera).and_then(|n| n.as_camera()).map(Camera::projection) {
        Some(Projection::Perspective { aspect, .. }) => assert_eq!(aspect, 2.0),
        other => panic!("unexpected projection {other:?}"),
    }
}

#[test]
fn wireframe_is_a_toggle() {
    let mut engine = Engine::new(EngineConfig::default());
    assert!(!engine.wireframe());
    engine.set_wireframe(true);
    assert!(engine.wireframe());
}

#[test]
fn fps_counter_publishes_once_per_second() {
    let mut counter = FpsCounter::default();
    let start = Instant::now();
    for i in 0..30 {
        counter.frame_at(start + Duration::from_millis(i * 10));
    }
    assert_eq!(counter.fps(), 0);

    counter.frame_at(start + Duration::from_millis(1100));
    assert_eq!(counter.fps(), 31);
}

#[test]
fn frame_builder_emits_three_vertices_per_face() {
    let (mut engine, root, _) = engine_with_camera();
    let scene = engine.scene_mut();
    let lamp = scene.create_light("lamp", translation(0.0, 5.0, 0.0), Light::omni());
    let material = scene.add_material(Material::new("grey"));
    let mut mesh = Mesh::cuboid(1.0, 1.0, 1.0);
    mesh.material = Some(material);
    let cube = scene.create_mesh("cube", translation(0.0, 1.0, 0.0), mesh);
    scene.add_child(root, lamp);
    scene.add_child(root, cube);

    let mut frame = FrameBuilder::new([0.0, 0.0, 0.0, 0.5]);
    assert!(engine.frame(&mut frame));
    // one lit cube and its shadow
    assert_eq!(frame.vertices().len(), 12 * 3 * 2);
    assert!(
        frame
            .vertices()
            .iter()
            .all(|v| v.color.iter().all(|c| (0.0..=1.0).contains(c)))
    );
    assert!(frame.vertices().iter().any(|v| v.color == [0.0, 0.0, 0.0, 0.5]));

    frame.reset();
    assert!(frame.vertices().is_empty());
}

#[test]
fn unslotted_lights_do_not_shade() {
    let mut frame = FrameBuilder::default();
    let light = Light::omni();
    frame.draw_light(hanoi_ngin::render::LightDraw {
        name: "dark",
        light: &light,
        modelview: Matrix4::identity(),
    });
    let mesh = Mesh::cuboid(1.0, 1.0, 1.0);
    frame.draw_mesh(hanoi_ngin::render::MeshDraw {
        name: "cube",
        mesh: &mesh,
        material: None,
        modelview: Matrix4::identity(),
        pass: hanoi_ngin::render::MeshPass::Lit,
    });
    // default material: no emission and no lights, only its alpha survives
    assert!(frame.vertices().iter().all(|v| v.color[..3] == [0.0, 0.0, 0.0]));
}
