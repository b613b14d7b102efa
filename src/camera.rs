//! Camera projections.
//!
//! A camera is a scene node whose payload is a [`Camera`]. The node's world
//! matrix places the eye; the view transform is its inverse. The payload only
//! owns the projection:
//!
//! - [`Projection::Perspective`]: vertical field of view, aspect ratio and clip planes
//! - [`Projection::Ortho`]: an axis-aligned clip box
//!
//! Parameters are normalised on the way in so the projection matrix is always
//! well formed (swapped planes get swapped back, invalid angles and ratios get
//! defaults).

use cgmath::{Deg, Matrix4, SquareMatrix};
use log::debug;

pub const RATIO_16_9: f32 = 16.0 / 9.0;
pub const RATIO_16_10: f32 = 16.0 / 10.0;
pub const RATIO_4_3: f32 = 4.0 / 3.0;
pub const RATIO_21_9: f32 = 21.0 / 9.0;

/// Field of view used when a negative one is requested, in degrees.
pub const DEFAULT_FOV: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective {
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Ortho {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if b < a {
        debug!("Swapping inverted camera planes {a} and {b}.");
        (b, a)
    } else {
        (a, b)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    projection: Projection,
}

impl Camera {
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            projection: Projection::Perspective {
                fov: DEFAULT_FOV,
                aspect: RATIO_16_9,
                near: 0.1,
                far: 100.0,
            },
        };
        camera.set_perspective(fov, aspect, near, far);
        camera
    }

    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            projection: Projection::Ortho {
                left: -1.0,
                right: 1.0,
                bottom: -1.0,
                top: 1.0,
                near: -1.0,
                far: 1.0,
            },
        };
        camera.set_ortho(left, right, bottom, top, near, far);
        camera
    }

    /// Orthographic camera centred on its axis, `width` by `height` units large.
    pub fn ortho_extent(width: f32, height: f32, near: f32, far: f32) -> Self {
        Self::ortho(
            -width / 2.0,
            width / 2.0,
            -height / 2.0,
            height / 2.0,
            near,
            far,
        )
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    /// Turns the camera into a perspective one.
    ///
    /// A negative `fov` falls back to [`DEFAULT_FOV`], a negative `aspect` to 16:9
    /// and `near`/`far` are swapped if given in the wrong order.
    pub fn set_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        let fov = if fov < 0.0 { DEFAULT_FOV } else { fov };
        let aspect = if aspect < 0.0 { RATIO_16_9 } else { aspect };
        let (near, far) = ordered(near, far);
        self.projection = Projection::Perspective {
            fov,
            aspect,
            near,
            far,
        };
    }

    /// Turns the camera into an orthographic one; inverted bounds are swapped.
    pub fn set_ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        let (left, right) = ordered(left, right);
        let (bottom, top) = ordered(bottom, top);
        let (near, far) = ordered(near, far);
        self.projection = Projection::Ortho {
            left,
            right,
            bottom,
            top,
            near,
            far,
        };
    }

    pub fn set_ortho_extent(&mut self, width: f32, height: f32, near: f32, far: f32) {
        self.set_ortho(
            -width / 2.0,
            width / 2.0,
            -height / 2.0,
            height / 2.0,
            near,
            far,
        );
    }

    /// Adapts the projection to a viewport of `width` x `height` pixels.
    ///
    /// Perspective cameras keep their field of view. Orthographic cameras keep
    /// their vertical extent and widen or narrow horizontally.
    pub fn fit_viewport(&mut self, width: u32, height: u32) {
        let aspect = width as f32 / height.max(1) as f32;
        match &mut self.projection {
            Projection::Perspective { aspect: a, .. } => *a = aspect,
            Projection::Ortho {
                left,
                right,
                bottom,
                top,
                ..
            } => {
                let target_height = (*top - *bottom).max(1.0);
                *top = target_height / 2.0;
                *bottom = -*top;
                *right = *top * aspect;
                *left = -*right;
            }
        }
    }

    /// OpenGL-style clip-space projection matrix.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.projection {
            Projection::Perspective {
                fov,
                aspect,
                near,
                far,
            } => {
                // cgmath panics on degenerate frusta
                let fov = fov.clamp(0.01, 179.9);
                let aspect = aspect.max(f32::EPSILON);
                let near = near.max(f32::EPSILON);
                let far = far.max(near + f32::EPSILON);
                cgmath::perspective(Deg(fov), aspect, near, far)
            }
            Projection::Ortho {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => cgmath::ortho(left, right, bottom, top, near, far),
        }
    }

    /// View matrix for a camera node whose world matrix is `world`.
    pub fn view_matrix(world: Matrix4<f32>) -> Matrix4<f32> {
        world.invert().unwrap_or_else(|| {
            debug!("Camera world matrix is singular, using identity view.");
            Matrix4::identity()
        })
    }
}
