//! Tower of Hanoi on top of the engine.
//!
//! Keys:
//! - arrows left/right move the selector spot, up picks up the top disk, down puts it back
//! - `i`/`o` undo and redo, `l` restarts
//! - `w`/`s`/`a`/`d`/`e`/`q`, left shift and left ctrl move the camera, `f` switches cameras
//! - `m` dollies the camera forward, `r` starts or stops an orbit
//! - `k` toggles wireframe

pub mod game;
pub mod scene;
pub mod transform;

pub use game::{Hanoi, Stacks};
pub use scene::HanoiScene;
