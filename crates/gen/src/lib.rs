//! Galaxy generator: maps a declarative parameter set to a flat point cloud.
//!
//! # Invariants
//! - Generation is pure with respect to its inputs: the same parameters and
//!   the same seeded random source give bit-identical buffers.
//! - `positions.len() == colors.len() == 3 * count` for every cloud produced.
//! - Failure is all-or-nothing; no partially filled cloud escapes.

pub mod cloud;
pub mod config;
pub mod generator;
pub mod params;
pub mod random;

pub use cloud::{Bounds, PointCloud};
pub use generator::{GenerateError, branch_angle, generate, generate_cancellable};
pub use params::{GalaxyParameters, Geometry};
pub use random::{RandomSource, RngSource, SplitMix64};
