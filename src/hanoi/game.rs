//! Game rules and key bindings.
//!
//! The board state is three stacks of disk ids (bottom first). Every legal
//! put-down records a snapshot of the stacks; undo and redo move through
//! those snapshots and rebuild the scene from them.

use cgmath::{Deg, Matrix4, Vector3, Vector4};
use log::{debug, info};

use crate::{
    data_structures::material::{Material, MaterialId},
    data_structures::scene_graph::NodeId,
    engine::Engine,
    flow::{Client, Key},
    hanoi::{
        scene::{HanoiScene, PEG_SPACING, stack_offset},
        transform::{reattach, remove_rotation, remove_translation},
    },
};

pub const GLOWING_MATERIAL: &str = "Glowing";

/// Disks per peg, bottom first.
pub type Stacks = [Vec<NodeId>; 3];

const SLIDE_TICKS: i32 = 25;
const TILT: Deg<f32> = Deg(25.0);
const SPIN: Deg<f32> = Deg(4.0);
const LIFT_STEP: f32 = 0.05;
const LIFT_TICKS: i32 = 15;
/// Extra lift ticks per level a disk has to clear.
const LEVEL_TICKS: i32 = 5;

#[derive(Debug)]
pub struct Hanoi {
    nodes: HanoiScene,
    stacks: Stacks,
    history: Vec<Stacks>,
    current: usize,
    selector: usize,
    held: Option<NodeId>,
    won: bool,
    /// Highlighted disk and the material it had before.
    glow: Option<(NodeId, Option<MaterialId>)>,
    glowing: MaterialId,
    camera: usize,
}

impl Hanoi {
    /// Start a game on `nodes`, all disks stacked on the first peg.
    pub fn new(engine: &mut Engine, nodes: HanoiScene) -> Self {
        let scene = engine.scene_mut();
        let glowing = match scene.find_material(GLOWING_MATERIAL) {
            Some(id) => id,
            None => scene.add_material(Material::with_colors(
                GLOWING_MATERIAL,
                Vector4::new(1.0, 0.794, 0.0, 1.0),
                Vector4::new(0.1, 0.08, 0.0, 1.0),
                Vector4::new(0.4, 0.32, 0.0, 1.0),
            )),
        };
        let initial: Stacks = [nodes.disks.clone(), Vec::new(), Vec::new()];
        let mut game = Self {
            stacks: initial.clone(),
            history: vec![initial.clone()],
            current: 0,
            selector: 0,
            held: None,
            won: false,
            glow: None,
            glowing,
            camera: 0,
            nodes,
        };
        game.apply(engine, initial);
        engine.set_active_camera(game.active_camera());
        game
    }

    pub fn nodes(&self) -> &HanoiScene {
        &self.nodes
    }

    pub fn stacks(&self) -> &Stacks {
        &self.stacks
    }

    pub fn selector(&self) -> usize {
        self.selector
    }

    pub fn held(&self) -> Option<NodeId> {
        self.held
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.glow.map(|(disk, _)| disk)
    }

    pub fn glowing_material(&self) -> MaterialId {
        self.glowing
    }

    pub fn moves(&self) -> usize {
        self.current
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn active_camera(&self) -> NodeId {
        self.nodes.cameras[self.camera]
    }

    /// Size of `disk`, the largest disk being the number of disks.
    pub fn size(&self, disk: NodeId) -> usize {
        let count = self.nodes.disks.len();
        self.nodes
            .disks
            .iter()
            .position(|&d| d == disk)
            .map_or(0, |i| count - i)
    }

    /// Pick up the top disk under the selector.
    pub fn lift(&mut self, engine: &mut Engine) -> bool {
        self.settle(engine);
        if self.held.is_some() || self.stacks[self.selector].is_empty() {
            return false;
        }
        let scene = engine.scene_mut();
        let height = self.stacks[self.selector].len();
        let Some(disk) = self.stacks[self.selector].pop() else {
            return false;
        };
        reattach(scene, disk, self.nodes.spot, true);
        if let Some(local) = scene.matrix(disk) {
            scene.set_matrix(disk, local * Matrix4::from_angle_x(TILT));
        }
        let up = Matrix4::from_translation(Vector3::new(0.0, LIFT_STEP, 0.0));
        scene.move_by(disk, Matrix4::from_angle_y(SPIN), -1);
        scene.move_by(disk, up, LIFT_TICKS);
        scene.move_by(disk, up, self.clearance(height));
        self.held = Some(disk);
        debug!("Lifted disk of size {} from peg {}", self.size(disk), self.selector + 1);
        true
    }

    /// Put the held disk on the peg under the selector, if the move is legal.
    pub fn put_down(&mut self, engine: &mut Engine) -> bool {
        self.settle(engine);
        let Some(disk) = self.held else {
            return false;
        };
        let target = &self.stacks[self.selector];
        if !target.last().is_none_or(|&top| self.size(disk) < self.size(top)) {
            debug!("Disk of size {} does not fit on peg {}", self.size(disk), self.selector + 1);
            return false;
        }

        let scene = engine.scene_mut();
        scene.reset_move(disk);
        remove_rotation(scene, disk);
        let height = self.stacks[self.selector].len();
        self.stacks[self.selector].push(disk);
        reattach(scene, disk, self.nodes.pegs[self.selector], true);
        let down = Matrix4::from_translation(Vector3::new(0.0, -LIFT_STEP, 0.0));
        scene.move_by(disk, down, LIFT_TICKS);
        scene.move_by(disk, down, self.clearance(height + 1));
        self.held = None;

        if Self::solved(&self.stacks) {
            info!("Solved in {} moves", self.current + 1);
            self.won = true;
        }
        self.record();
        true
    }

    /// Slide the selector one peg to the left (`-1`) or right (`1`).
    pub fn shift(&mut self, engine: &mut Engine, offset: isize) -> bool {
        let target = self.selector.checked_add_signed(offset).filter(|&t| t < self.stacks.len());
        let moved = match target {
            Some(target) => {
                self.settle(engine);
                let scene = engine.scene_mut();
                self.selector = target;
                reattach(scene, self.nodes.spot, self.nodes.pegs[target], false);
                let step = PEG_SPACING / SLIDE_TICKS as f32 * offset.signum() as f32;
                scene.move_by(
                    self.nodes.spot,
                    Matrix4::from_translation(Vector3::new(step, 0.0, 0.0)),
                    SLIDE_TICKS,
                );
                true
            }
            None => false,
        };
        self.highlight(engine, self.selector);
        moved
    }

    pub fn undo(&mut self, engine: &mut Engine) -> bool {
        if self.held.is_some() {
            info!("Put the disk down before undoing a move.");
            return false;
        }
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.apply(engine, self.history[self.current].clone());
        true
    }

    pub fn redo(&mut self, engine: &mut Engine) -> bool {
        if self.held.is_some() {
            info!("Put the disk down before redoing a move.");
            return false;
        }
        if self.current + 1 >= self.history.len() {
            return false;
        }
        self.current += 1;
        self.apply(engine, self.history[self.current].clone());
        true
    }

    /// Back to the starting position with an empty history.
    pub fn reset(&mut self, engine: &mut Engine) {
        self.current = 0;
        self.history.truncate(1);
        self.won = false;
        self.apply(engine, self.history[0].clone());
    }

    /// Switch between the perspective and the orthographic camera.
    pub fn toggle_camera(&mut self, engine: &mut Engine) {
        self.camera = (self.camera + 1) % self.nodes.cameras.len();
        engine.set_active_camera(self.active_camera());
    }

    /// All disks on one peg other than the first.
    pub fn solved(stacks: &Stacks) -> bool {
        stacks[0].is_empty() && (stacks[1].is_empty() || stacks[2].is_empty())
    }

    fn clearance(&self, height: usize) -> i32 {
        LEVEL_TICKS * self.nodes.disks.len().saturating_sub(height) as i32
    }

    /// Finish the spot slide and the held disk's lift so the next action starts at rest.
    fn settle(&self, engine: &mut Engine) {
        let scene = engine.scene_mut();
        scene.finish_move(self.nodes.spot);
        if let Some(disk) = self.held {
            scene.finish_move(disk);
        }
    }

    fn record(&mut self) {
        self.history.truncate(self.current + 1);
        self.history.push(self.stacks.clone());
        self.current += 1;
    }

    /// Rebuild the scene from `stacks`.
    fn apply(&mut self, engine: &mut Engine, stacks: Stacks) {
        let scene = engine.scene_mut();
        if let Some(disk) = self.held.take() {
            scene.reset_move(disk);
            remove_rotation(scene, disk);
        }
        for (&peg, disks) in self.nodes.pegs.iter().zip(&stacks) {
            for (level, &disk) in disks.iter().enumerate() {
                scene.reset_move(disk);
                remove_rotation(scene, disk);
                remove_translation(scene, disk);
                if let Some(local) = scene.matrix(disk) {
                    scene.set_matrix(disk, stack_offset(level) * local);
                }
                if scene.parent(disk) != Some(peg) {
                    scene.add_child(peg, disk);
                }
            }
        }
        self.stacks = stacks;
        self.highlight(engine, self.selector);
    }

    /// Make the top disk of peg `index` glow, restoring the previous one.
    fn highlight(&mut self, engine: &mut Engine, index: usize) {
        if self.held.is_some() {
            return;
        }
        let scene = engine.scene_mut();
        if let Some((disk, material)) = self.glow.take() {
            scene.set_mesh_material(disk, material);
        }
        let Some(&top) = self.stacks.get(index).and_then(|s| s.last()) else {
            return;
        };
        let previous = scene.mesh_material(top);
        if scene.set_mesh_material(top, Some(self.glowing)) {
            self.glow = Some((top, previous));
        }
    }

    fn transform_camera(&self, engine: &mut Engine, f: impl FnOnce(Matrix4<f32>) -> Matrix4<f32>) {
        let camera = self.active_camera();
        let scene = engine.scene_mut();
        if let Some(local) = scene.matrix(camera) {
            scene.set_matrix(camera, f(local));
        }
    }

    fn on_char(&mut self, engine: &mut Engine, c: char) {
        let translation = |x: f32, y: f32, z: f32| Matrix4::from_translation(Vector3::new(x, y, z));
        match c {
            'k' => engine.set_wireframe(!engine.wireframe()),
            'l' => self.reset(engine),
            'a' => self.transform_camera(engine, |m| Matrix4::from_angle_y(Deg(-1.0)) * m),
            'd' => self.transform_camera(engine, |m| Matrix4::from_angle_y(Deg(1.0)) * m),
            'w' => self.transform_camera(engine, |m| m * translation(0.0, 0.0, -1.0)),
            's' => self.transform_camera(engine, |m| m * translation(0.0, 0.0, 1.0)),
            'e' => self.transform_camera(engine, |m| m * Matrix4::from_angle_x(Deg(1.0))),
            'q' => self.transform_camera(engine, |m| m * Matrix4::from_angle_x(Deg(-1.0))),
            'm' => {
                engine
                    .scene_mut()
                    .move_by(self.active_camera(), translation(0.0, 0.0, -1.0), 10);
            }
            'r' => {
                let camera = self.active_camera();
                let scene = engine.scene_mut();
                let queued = scene
                    .get(camera)
                    .is_some_and(|n| n.movement().pending_steps() > 0);
                if scene.is_moving(camera) {
                    scene.stop_move(camera);
                } else if queued {
                    scene.resume_move(camera);
                } else {
                    scene.move_by(camera, Matrix4::from_angle_y(Deg(0.25)), 1440);
                }
            }
            'f' => self.toggle_camera(engine),
            'i' => {
                self.undo(engine);
            }
            'o' => {
                self.redo(engine);
            }
            _ => {}
        }
    }
}

impl Client for Hanoi {
    fn on_key(&mut self, engine: &mut Engine, key: Key) {
        if self.won {
            self.reset(engine);
            return;
        }
        let translation = |y: f32| Matrix4::from_translation(Vector3::new(0.0, y, 0.0));
        match key {
            Key::Up => {
                self.lift(engine);
            }
            Key::Down => {
                self.put_down(engine);
            }
            Key::Left => {
                self.shift(engine, -1);
            }
            Key::Right => {
                self.shift(engine, 1);
            }
            Key::ShiftLeft => self.transform_camera(engine, |m| m * translation(1.0)),
            Key::CtrlLeft => self.transform_camera(engine, |m| m * translation(-1.0)),
            Key::Char(c) => self.on_char(engine, c.to_ascii_lowercase()),
            _ => {}
        }
    }

    fn status(&self, engine: &Engine) -> Option<String> {
        let mut status = format!("FPS: {} | Moves: {}", engine.fps(), self.moves());
        if self.won {
            status.push_str(" | YOU WIN | Press any key to restart");
        }
        Some(status)
    }
}
