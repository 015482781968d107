//! Rendering Adapter: the boundary between generated clouds and a renderer.
//!
//! # Invariants
//! - Renderers read clouds; they never mutate them.
//! - A slot holds at most one uploaded cloud, and every upload is released
//!   exactly once: on replacement, on clear, or when the slot is dropped.
//!
//! # Workaround
//! Provides a trait-based renderer interface with a debug text renderer and
//! an in-memory backend standing in for GPU buffers. Swap in a GPU backend by
//! implementing [`CloudBackend`] without changing consumers.

mod renderer;
mod slot;
mod vertex;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use slot::{BackendError, CloudBackend, CloudSlot, MemoryBackend, PointMaterial};
pub use vertex::{PointVertex, as_bytes, interleave};

pub fn crate_info() -> &'static str {
    "galaxy-render v0.1.0"
}
