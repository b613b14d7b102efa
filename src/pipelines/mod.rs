//! Render pipelines used by the window [`Context`](crate::context::Context).
//!
//! - `basic` holds the pre-lit vertex format, the CPU frame assembly and the
//!   fill/wireframe pipelines that draw it

pub mod basic;
