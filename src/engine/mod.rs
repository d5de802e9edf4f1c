//! Engine - Segment registry and parallel arrays.
//!
//! Segments are indices into columnar reactive arrays rather than objects.
//! The registry hands out indices; the arrays hold per-segment state; the
//! orchestrator and the rendering collaborator address segments by index.

pub mod arrays;
mod registry;

pub use registry::{
    allocate_index, release_index, get_index, get_id,
    get_allocated_indices, get_allocated_count, is_allocated,
    reset_registry,
};
