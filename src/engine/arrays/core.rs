//! Core Arrays - Segment identity within its sequence.
//!
//! - slot: Position of the segment in the owning widget, `[0, length)`
//!
//! Slot order doubles as tab order for focus navigation.

use spark_signals::{dirty_set, tracked_slot_array, TrackedSlotArray};
use super::ClearAll;

thread_local! {
    /// Position within the owning sequence.
    static SLOT: TrackedSlotArray<u16> = tracked_slot_array(Some(0), dirty_set());
}

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    SLOT.with(|arr| { let _ = arr.peek(index); });
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    SLOT.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    SLOT.with(|arr| arr.clear_all());
}

/// Get slot position at index (reactive).
pub fn get_slot(index: usize) -> usize {
    SLOT.with(|arr| arr.get(index).unwrap()) as usize
}

/// Set slot position at index.
pub fn set_slot(index: usize, slot: usize) {
    SLOT.with(|arr| arr.set_value(index, slot as u16));
}
