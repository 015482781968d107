//! Vector math shared by the generator and the render boundary.
//!
//! # Invariants
//! - Every operation is pure: inputs are taken by value and never retained.
//! - Axes are directions only; magnitude is normalized away before use.
//! - A zero-length vector is an error, never a silent NaN.

mod rotation;
mod vector;

pub use rotation::{AxisRotation, rotate_around_axis};
pub use vector::{MathError, normalize};

pub use glam::DVec3;
