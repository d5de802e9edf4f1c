//! Content Arrays - The committed character per segment.
//!
//! A segment holds a string of length zero (empty) or one grapheme cluster.
//! The orchestrator assembles the aggregate value by polling these cells in
//! slot order; an empty cell contributes nothing.

use spark_signals::{dirty_set, tracked_slot_array, TrackedSlotArray};
use super::ClearAll;

thread_local! {
    /// Committed character ("" or exactly one grapheme cluster).
    static CONTENT: TrackedSlotArray<String> = tracked_slot_array(Some(String::new()), dirty_set());
}

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    CONTENT.with(|arr| { let _ = arr.peek(index); });
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    CONTENT.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    CONTENT.with(|arr| arr.clear_all());
}

/// Get content at index (reactive).
pub fn get_content(index: usize) -> String {
    CONTENT.with(|arr| arr.get(index).unwrap())
}

/// Set content at index.
pub fn set_content(index: usize, content: String) {
    CONTENT.with(|arr| arr.set_value(index, content));
}

/// Check whether the segment at index holds a character (reactive).
pub fn has_content(index: usize) -> bool {
    !get_content(index).is_empty()
}
