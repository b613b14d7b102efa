//! Lights and light slots.
//!
//! Fixed-function pipelines expose a small number of light units. Every light
//! node claims one [`LightSlot`] from the scene's [`LightSlots`] allocator when
//! it is created and returns it when the node is destroyed. Lights created
//! while every slot is taken stay in the scene but do not illuminate anything.

use cgmath::{Vector3, Vector4};
use log::warn;

/// Number of light units available at the same time.
pub const MAX_LIGHTS: usize = 6;

/// Light cone half-angle of an omnidirectional light, in degrees.
pub const OMNI_CUTOFF: f32 = 180.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightSlot(u8);

impl LightSlot {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Hands out light slots up to a fixed capacity.
#[derive(Clone, Debug)]
pub struct LightSlots {
    taken: Vec<bool>,
}

impl Default for LightSlots {
    fn default() -> Self {
        Self::with_capacity(MAX_LIGHTS)
    }
}

impl LightSlots {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            taken: vec![false; capacity.min(u8::MAX as usize)],
        }
    }

    /// Claim the lowest free slot.
    pub fn acquire(&mut self) -> Option<LightSlot> {
        let free = self.taken.iter().position(|taken| !taken);
        match free {
            Some(i) => {
                self.taken[i] = true;
                Some(LightSlot(i as u8))
            }
            None => {
                warn!(
                    "All {} light slots are in use, the new light will stay dark.",
                    self.taken.len()
                );
                None
            }
        }
    }

    pub fn release(&mut self, slot: LightSlot) {
        if let Some(taken) = self.taken.get_mut(slot.index()) {
            *taken = false;
        }
    }

    pub fn in_use(&self) -> usize {
        self.taken.iter().filter(|t| **t).count()
    }

    pub fn capacity(&self) -> usize {
        self.taken.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Positional light shining in every direction.
    Omni,
    /// Positional light shining down the node's -Y axis within `cutoff` degrees.
    Spot { cutoff: f32 },
    /// Directional light shining down the node's -Z axis.
    Infinite,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    kind: LightKind,
    pub ambient: Vector4<f32>,
    pub diffuse: Vector4<f32>,
    pub specular: Vector4<f32>,
    /// Constant, linear and quadratic attenuation factors.
    pub attenuation: Vector3<f32>,
    pub(crate) slot: Option<LightSlot>,
}

impl Light {
    fn with_kind(kind: LightKind) -> Self {
        Self {
            kind,
            ambient: Vector4::new(1.0, 1.0, 1.0, 1.0),
            diffuse: Vector4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vector4::new(1.0, 1.0, 1.0, 1.0),
            attenuation: Vector3::new(1.0, 0.0, 0.0),
            slot: None,
        }
    }

    pub fn omni() -> Self {
        Self::with_kind(LightKind::Omni)
    }

    /// Spot light with a cone half-angle in degrees. Angles outside `0..=90` fall back to 0.
    pub fn spot(cutoff: f32) -> Self {
        Self::with_kind(LightKind::Spot {
            cutoff: Self::clamp_cutoff(cutoff),
        })
    }

    pub fn infinite() -> Self {
        Self::with_kind(LightKind::Infinite)
    }

    fn clamp_cutoff(cutoff: f32) -> f32 {
        if (0.0..=90.0).contains(&cutoff) {
            cutoff
        } else {
            warn!("Spot cutoff {cutoff} is outside 0..=90 degrees, using 0.");
            0.0
        }
    }

    pub fn kind(&self) -> LightKind {
        self.kind
    }

    pub fn cutoff(&self) -> f32 {
        match self.kind {
            LightKind::Spot { cutoff } => cutoff,
            LightKind::Omni | LightKind::Infinite => OMNI_CUTOFF,
        }
    }

    /// Changes the cone of a spot light. Other lights ignore it.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        if let LightKind::Spot { cutoff: c } = &mut self.kind {
            *c = Self::clamp_cutoff(cutoff);
        }
    }

    /// Homogeneous light position in node space (`w == 0` for directional lights).
    pub fn position(&self) -> Vector4<f32> {
        match self.kind {
            LightKind::Infinite => Vector4::new(0.0, 0.0, 1.0, 0.0),
            LightKind::Omni | LightKind::Spot { .. } => Vector4::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    /// Cone axis in node space, if the light has one.
    pub fn direction(&self) -> Option<Vector3<f32>> {
        match self.kind {
            LightKind::Spot { .. } => Some(Vector3::new(0.0, -1.0, 0.0)),
            LightKind::Omni | LightKind::Infinite => None,
        }
    }

    pub fn slot(&self) -> Option<LightSlot> {
        self.slot
    }
}
