use approx::assert_abs_diff_eq;
use hanoi_ngin::{
    Engine, EngineConfig, Matrix4, NodeId, Scene, SquareMatrix, Vector3,
    camera::Camera,
    hanoi::{Hanoi, HanoiScene},
};

pub const EPSILON: f32 = 1e-4;

pub fn assert_matrix_eq(actual: Matrix4<f32>, expected: Matrix4<f32>) {
    let a: [[f32; 4]; 4] = actual.into();
    let e: [[f32; 4]; 4] = expected.into();
    for (col_a, col_e) in a.iter().zip(e.iter()) {
        for (x, y) in col_a.iter().zip(col_e.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = EPSILON);
        }
    }
}

pub fn assert_vector_eq(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-3);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-3);
    assert_abs_diff_eq!(actual.z, expected.z, epsilon = 1e-3);
}

pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

pub fn world_position(scene: &Scene, id: NodeId) -> Vector3<f32> {
    scene
        .world_matrix(id)
        .expect("node exists")
        .w
        .truncate()
}

/// Engine with an empty root and a perspective camera at `(0, 0, 5)` below it.
pub fn engine_with_camera() -> (Engine, NodeId, NodeId) {
    let mut engine = Engine::new(EngineConfig::default());
    let scene = engine.scene_mut();
    let root = scene.create_node("root", Matrix4::identity());
    let camera = scene.create_camera(
        "camera",
        translation(0.0, 0.0, 5.0),
        Camera::perspective(45.0, 16.0 / 9.0, 1.0, 100.0),
    );
    scene.add_child(root, camera);
    engine.set_root(root);
    assert!(engine.set_active_camera(camera));
    (engine, root, camera)
}

pub fn hanoi_game() -> (Engine, Hanoi) {
    let mut engine = Engine::new(EngineConfig::default());
    let nodes = HanoiScene::build(&mut engine).expect("procedural scene is complete");
    let game = Hanoi::new(&mut engine, nodes);
    (engine, game)
}
