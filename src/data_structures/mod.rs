//! Engine data structures: the scene graph and the payloads its nodes carry.
//!
//! - `scene_graph` is the node arena (hierarchy, world matrices, destruction)
//! - `movement` holds the per-node queue of scripted incremental transforms
//! - `mesh` contains CPU geometry and procedural shape builders
//! - `material` holds surface colours and an optional texture
//! - `texture` contains decoded RGBA images and the GPU depth buffer
//! - `light` holds the light family and the light-slot allocator

pub mod light;
pub mod material;
pub mod mesh;
pub mod movement;
pub mod scene_graph;
pub mod texture;
