//! Scripted node movement.
//!
//! A [`Movement`] is a queue of incremental transforms that get applied to a
//! node's local matrix one tick at a time. Every tick pre-multiplies the local
//! matrix by each pending step, so a step of "rotate 1° about Z" queued 90 times
//! turns the node by 90° over 90 frames.
//!
//! Finite steps are dropped once their counter reaches zero, infinite steps keep
//! applying until [`Movement::reset`] clears the queue. The queue reports
//! [`Movement::is_moving`] while a finite step is left, so callers can finish a
//! node's scripted movement instantly:
//!
//! ```ignore
//! while scene.is_moving(disk) {
//!     scene.calculate_move(disk);
//! }
//! ```

use cgmath::{Matrix4, SquareMatrix};

/// How many ticks a step still has to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Remaining {
    Finite(u32),
    Infinite,
}

impl Remaining {
    fn from_count(count: i32) -> Self {
        match u32::try_from(count) {
            Ok(count) => Remaining::Finite(count),
            Err(_) => Remaining::Infinite,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub transform: Matrix4<f32>,
    pub remaining: Remaining,
}

#[derive(Clone, Debug)]
pub struct Movement {
    destination: Matrix4<f32>,
    steps: Vec<Step>,
    moving: bool,
    paused: bool,
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Matrix4::identity())
    }
}

impl Movement {
    /// Idle movement of a node whose local matrix starts at `start`.
    pub fn new(start: Matrix4<f32>) -> Self {
        Self {
            destination: start,
            steps: Vec::new(),
            moving: false,
            paused: false,
        }
    }

    /// Queue `step` to be applied `count` times, or forever if `count` is negative.
    ///
    /// Queuing an infinite step that is already queued does not stack a second
    /// copy of it.
    pub fn push(&mut self, step: Matrix4<f32>, count: i32) {
        for _ in 0..count.max(0) {
            self.destination = step * self.destination;
        }
        self.moving = true;
        self.paused = false;

        let duplicate = self
            .steps
            .iter()
            .any(|s| s.remaining == Remaining::Infinite && s.transform == step);
        if duplicate {
            return;
        }
        self.steps.push(Step {
            transform: step,
            remaining: Remaining::from_count(count),
        });
    }

    /// Advance one tick, returning the new local matrix.
    pub fn tick(&mut self, local: Matrix4<f32>) -> Matrix4<f32> {
        if self.paused {
            return local;
        }
        let mut local = local;
        self.steps.retain_mut(|step| match &mut step.remaining {
            Remaining::Infinite => {
                local = step.transform * local;
                true
            }
            Remaining::Finite(0) => false,
            Remaining::Finite(n) => {
                local = step.transform * local;
                *n -= 1;
                *n > 0
            }
        });
        self.moving = self
            .steps
            .iter()
            .any(|s| matches!(s.remaining, Remaining::Finite(_)));
        local
    }

    pub fn stop(&mut self) {
        self.moving = false;
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.moving = true;
        self.paused = false;
    }

    pub fn reset(&mut self) {
        self.steps.clear();
        self.moving = false;
        self.paused = false;
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Local matrix the node reaches once every finite step queued so far has run,
    /// starting from its initial matrix.
    pub fn destination(&self) -> Matrix4<f32> {
        self.destination
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn pending_steps(&self) -> usize {
        self.steps.len()
    }
}
