//! The Tower of Hanoi scene.
//!
//! The game only relies on node names: three pegs `Stick1..3`, the disks
//! listed in [`DISK_NAMES`] (largest first) stacked on the first peg, and a
//! spot light named `Spot` hanging above the first peg. [`HanoiScene::build`]
//! creates such a scene procedurally; [`HanoiScene::locate`] finds the same
//! nodes in a loaded one. Both add the two game cameras below the root.

use anyhow::{Context as _, bail};
use cgmath::{Deg, Matrix4, SquareMatrix, Vector3, Vector4};
use log::debug;

use crate::{
    camera::{Camera, RATIO_16_9},
    data_structures::{
        light::Light,
        material::{Material, MaterialId},
        mesh::Mesh,
        scene_graph::{NodeId, Scene},
    },
    engine::Engine,
};

pub const PEG_NAMES: [&str; 3] = ["Stick1", "Stick2", "Stick3"];
pub const DISK_NAMES: [&str; 7] = [
    "Black_cilinder",
    "Purple_cilinder",
    "Blue_cilinder",
    "Green_cilinder",
    "Yellow_cilinder",
    "Orange_cilinder",
    "Red_cilinder",
];
pub const SPOT_NAME: &str = "Spot";
pub const PERSPECTIVE_CAMERA_NAME: &str = "mainPerspectiveCamera";
pub const ORTHO_CAMERA_NAME: &str = "mainOrthoCamera";

/// Height of one disk, and so of one stack level.
pub const DISK_HEIGHT: f32 = 0.25;
/// Distance between neighbouring pegs along X.
pub const PEG_SPACING: f32 = 2.5;
pub const PEG_HEIGHT: f32 = 2.2;
/// Height of the selector spot above the peg base.
pub const SPOT_HEIGHT: f32 = 4.0;

const DISK_COLOURS: [[f32; 3]; 7] = [
    [0.1, 0.1, 0.1],
    [0.5, 0.1, 0.6],
    [0.1, 0.3, 0.9],
    [0.1, 0.7, 0.2],
    [0.9, 0.85, 0.1],
    [0.95, 0.5, 0.05],
    [0.85, 0.1, 0.1],
];

/// Local offset of the disk at stack level `level` on its peg.
pub fn stack_offset(level: usize) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(
        0.0,
        level as f32 * DISK_HEIGHT + DISK_HEIGHT / 2.0,
        0.0,
    ))
}

/// Handles of the nodes the game drives.
#[derive(Clone, Debug, PartialEq)]
pub struct HanoiScene {
    pub root: NodeId,
    pub pegs: [NodeId; 3],
    /// Disks from largest to smallest, all stacked on the first peg.
    pub disks: Vec<NodeId>,
    pub spot: NodeId,
    /// Perspective camera first, orthographic camera second.
    pub cameras: [NodeId; 2],
}

impl HanoiScene {
    /// Build the default board into `engine` and make it the root.
    pub fn build(engine: &mut Engine) -> anyhow::Result<Self> {
        let scene = engine.scene_mut();
        let root = scene.create_node("hanoitower", Matrix4::identity());

        let wood = scene.add_material(Material::solid("Wood", Vector4::new(0.55, 0.35, 0.2, 1.0)));
        let table_mesh = Mesh::cuboid(PEG_SPACING * 4.0, 0.2, 4.0).offset(Vector3::new(0.0, -0.1, 0.0));
        let table = scene.create_mesh("Table", Matrix4::identity(), with_material(table_mesh, wood));
        scene.add_child(root, table);

        let mut sun = Light::omni();
        sun.ambient = Vector4::new(0.6, 0.6, 0.6, 1.0);
        sun.diffuse = Vector4::new(0.7, 0.7, 0.7, 1.0);
        let sun = scene.create_light(
            "Omni",
            Matrix4::from_translation(Vector3::new(1.0, 10.0, 4.0)),
            sun,
        );
        scene.add_child(root, sun);

        let mut pegs = Vec::with_capacity(PEG_NAMES.len());
        for (i, name) in PEG_NAMES.iter().enumerate() {
            let x = (i as f32 - 1.0) * PEG_SPACING;
            let mesh = Mesh::cylinder(0.08, PEG_HEIGHT, 16).offset(Vector3::new(0.0, PEG_HEIGHT / 2.0, 0.0));
            let peg = scene.create_mesh(
                name,
                Matrix4::from_translation(Vector3::new(x, 0.0, 0.0)),
                with_material(mesh, wood),
            );
            scene.add_child(root, peg);
            pegs.push(peg);
        }

        let count = DISK_NAMES.len();
        for (level, (name, [r, g, b])) in DISK_NAMES.iter().zip(DISK_COLOURS).enumerate() {
            let size = (count - level) as f32;
            let material = scene.add_material(Material::solid(*name, Vector4::new(r, g, b, 1.0)));
            let mesh = Mesh::cylinder(0.25 + 0.13 * size, DISK_HEIGHT * 0.96, 32);
            let disk = scene.create_mesh(name, stack_offset(level), with_material(mesh, material));
            scene.add_child(pegs[0], disk);
        }

        let mut spot = Light::spot(25.0);
        spot.ambient = Vector4::new(0.0, 0.0, 0.0, 1.0);
        spot.diffuse = Vector4::new(1.0, 0.95, 0.8, 1.0);
        let spot = scene.create_light(
            SPOT_NAME,
            Matrix4::from_translation(Vector3::new(0.0, SPOT_HEIGHT, 0.0)),
            spot,
        );
        scene.add_child(pegs[0], spot);

        engine.set_root(root);
        Self::locate(engine, root)
    }

    /// Find the game nodes below `root` and add the game cameras to it.
    pub fn locate(engine: &mut Engine, root: NodeId) -> anyhow::Result<Self> {
        let scene = engine.scene_mut();
        let find = |scene: &Scene, name: &str| {
            scene
                .find_child(root, name)
                .with_context(|| format!("scene has no node named {name}"))
        };

        let mut pegs = [root; 3];
        for (peg, name) in pegs.iter_mut().zip(PEG_NAMES) {
            *peg = find(scene, name)?;
        }
        let disks = DISK_NAMES
            .iter()
            .map(|name| find(scene, name))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let spot = find(scene, SPOT_NAME)?;
        if scene.get(spot).and_then(|n| n.as_light()).is_none() {
            bail!("{SPOT_NAME} is not a light");
        }
        for &disk in &disks {
            if scene.parent(disk) != Some(pegs[0]) {
                scene.add_child(pegs[0], disk);
            }
        }
        if scene.parent(spot) != Some(pegs[0]) {
            scene.add_child(pegs[0], spot);
        }

        let cameras = add_cameras(scene, root);
        debug!("Hanoi scene ready: {} disks", disks.len());
        Ok(Self {
            root,
            pegs,
            disks,
            spot,
            cameras,
        })
    }
}

fn with_material(mut mesh: Mesh, material: MaterialId) -> Mesh {
    mesh.material = Some(material);
    mesh
}

fn add_cameras(scene: &mut Scene, root: NodeId) -> [NodeId; 2] {
    let perspective = scene.create_camera(
        PERSPECTIVE_CAMERA_NAME,
        Matrix4::from_angle_x(Deg(-15.0)) * Matrix4::from_translation(Vector3::new(0.0, 8.0, 15.0)),
        Camera::perspective(45.0, RATIO_16_9, 1.0, 5000.0),
    );
    let ortho = scene.create_camera(
        ORTHO_CAMERA_NAME,
        Matrix4::from_angle_x(Deg(-90.0)) * Matrix4::from_translation(Vector3::new(0.0, 0.0, 15.0)),
        Camera::ortho_extent(30.0, 20.0, 1.0, 5000.0),
    );
    scene.add_child(root, perspective);
    scene.add_child(root, ortho);
    [perspective, ortho]
}
