//! hanoi-ngin
//!
//! A small fixed-function scene-graph engine. Scenes are trees of nodes that
//! carry a local transform and an optional payload (mesh, light or camera).
//! Nodes can be scripted with incremental movements that advance one tick per
//! frame, and a per-frame render list flattens the tree into lights-first draw
//! order for the active camera. A Tower of Hanoi client ships on top of it.
//!
//! High-level modules
//! - `object`: unique ids and names shared by every engine entity
//! - `data_structures`: scene graph arena, movement queues, meshes, lights, materials, textures
//! - `camera`: perspective and orthographic projections
//! - `render`: the render list and the [`render::Renderer`] draw sink
//! - `engine`: the engine context (scene, active camera, viewport, fps)
//! - `resources`: glTF scene loading
//! - `context`: wgpu device/surface that presents recorded frames
//! - `pipelines`: render pipelines used by the context
//! - `flow`: winit event loop, key mapping and the [`flow::Client`] trait
//! - `hanoi`: the Tower of Hanoi game built on the engine
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod engine;
pub mod flow;
pub mod hanoi;
pub mod object;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use engine::{Engine, EngineConfig};
pub use data_structures::scene_graph::{NodeId, NodeKind, Scene};
