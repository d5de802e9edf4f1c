//! Interaction Arrays - Focusability.
//!
//! - focusable: Can receive focus (`!disabled` for a segment)
//!
//! Usually bound via a getter to the widget's `disabled` prop so a
//! host-side toggle flips every segment uniformly. A segment whose
//! focusable cell reads false also emits no intent events.

use spark_signals::{dirty_set, tracked_slot_array, TrackedSlotArray};
use super::ClearAll;

thread_local! {
    /// Can the segment receive focus.
    static FOCUSABLE: TrackedSlotArray<bool> = tracked_slot_array(Some(false), dirty_set());
}

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    FOCUSABLE.with(|arr| { let _ = arr.peek(index); });
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    FOCUSABLE.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    FOCUSABLE.with(|arr| arr.clear_all());
}

/// Get focusable at index (reactive).
pub fn get_focusable(index: usize) -> bool {
    FOCUSABLE.with(|arr| arr.get(index).unwrap())
}

/// Set focusable at index.
pub fn set_focusable(index: usize, focusable: bool) {
    FOCUSABLE.with(|arr| arr.set_value(index, focusable));
}

/// Set focusable from a getter function.
pub fn set_focusable_getter<F>(index: usize, getter: F)
where
    F: Fn() -> bool + 'static,
{
    FOCUSABLE.with(|arr| arr.set_getter(index, getter));
}
