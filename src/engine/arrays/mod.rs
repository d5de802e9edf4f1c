//! Parallel Arrays - Per-segment state.
//!
//! All segment state lives in these parallel arrays. Each array index
//! corresponds to one segment.
//!
//! Widgets write directly to these arrays using `set_value()` or a getter;
//! the rendering collaborator reads from them via `.get()`.
//!
//! All arrays use `TrackedSlotArray` for stable reactive cells with
//! fine-grained per-index tracking, so a reader only re-runs when the
//! specific indices it accesses have changed.
//!
//! # Array Categories
//!
//! - **core**: Slot position within the owning sequence
//! - **content**: The committed character
//! - **display**: Validity flag, masked mode
//! - **interaction**: Focusability

pub mod core;
pub mod content;
pub mod display;
pub mod interaction;

use spark_signals::TrackedSlotArray;

/// Trait adding `clear_all` to `TrackedSlotArray` (clears every slot).
///
/// spark-signals exposes per-index `clear` only; this restores the
/// whole-array reset the arrays rely on for `reset()`.
pub trait ClearAll {
    fn clear_all(&self);
}

impl<T: Clone + PartialEq + 'static> ClearAll for TrackedSlotArray<T> {
    fn clear_all(&self) {
        for i in 0..self.len() {
            self.clear(i);
        }
    }
}

use self::core as core_arrays;
use self::content as content_arrays;
use self::display as display_arrays;
use self::interaction as interaction_arrays;

/// Ensure all arrays have capacity for the given index.
///
/// Called by the registry when allocating.
pub fn ensure_all_capacity(index: usize) {
    core_arrays::ensure_capacity(index);
    content_arrays::ensure_capacity(index);
    display_arrays::ensure_capacity(index);
    interaction_arrays::ensure_capacity(index);
}

/// Clear all array values at an index.
///
/// Called by the registry when releasing.
pub fn clear_all_at_index(index: usize) {
    core_arrays::clear_at_index(index);
    content_arrays::clear_at_index(index);
    display_arrays::clear_at_index(index);
    interaction_arrays::clear_at_index(index);
}

/// Reset all parallel arrays to release memory.
///
/// Called automatically by the registry when the last segment is destroyed.
pub fn reset_all_arrays() {
    core_arrays::reset();
    content_arrays::reset();
    display_arrays::reset();
    interaction_arrays::reset();
}
