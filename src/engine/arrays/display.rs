//! Display Arrays - Render-facing segment state.
//!
//! - validity: Validation flag (ok/error) for error styling
//! - masked: Secret mode, draw the content masked
//!
//! The masked cell is usually bound via a getter to the widget's `secret`
//! prop, so a host-side toggle propagates to every segment uniformly without
//! touching content or focus.

use spark_signals::{dirty_set, tracked_slot_array, TrackedSlotArray};
use super::ClearAll;
use crate::types::Validity;

thread_local! {
    /// Validation flag.
    static VALIDITY: TrackedSlotArray<Validity> = tracked_slot_array(Some(Validity::Ok), dirty_set());

    /// Masked (secret) display mode.
    static MASKED: TrackedSlotArray<bool> = tracked_slot_array(Some(false), dirty_set());
}

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    VALIDITY.with(|arr| { let _ = arr.peek(index); });
    MASKED.with(|arr| { let _ = arr.peek(index); });
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    VALIDITY.with(|arr| arr.clear(index));
    MASKED.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    VALIDITY.with(|arr| arr.clear_all());
    MASKED.with(|arr| arr.clear_all());
}

// =============================================================================
// Validity
// =============================================================================

/// Get validity at index (reactive).
pub fn get_validity(index: usize) -> Validity {
    VALIDITY.with(|arr| arr.get(index).unwrap())
}

/// Set validity at index.
pub fn set_validity(index: usize, validity: Validity) {
    VALIDITY.with(|arr| arr.set_value(index, validity));
}

// =============================================================================
// Masked
// =============================================================================

/// Get masked mode at index (reactive).
pub fn get_masked(index: usize) -> bool {
    MASKED.with(|arr| arr.get(index).unwrap())
}

/// Set masked mode at index.
pub fn set_masked(index: usize, masked: bool) {
    MASKED.with(|arr| arr.set_value(index, masked));
}

/// Set masked mode from a getter function.
pub fn set_masked_getter<F>(index: usize, getter: F)
where
    F: Fn() -> bool + 'static,
{
    MASKED.with(|arr| arr.set_getter(index, getter));
}
