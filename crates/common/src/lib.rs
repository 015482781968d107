//! Shared types and utilities for the galaxy workspace.

pub mod types;

pub use types::{CloudId, ColorParseError, Rgb};
