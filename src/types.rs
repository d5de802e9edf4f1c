//! Core types shared across the engine.

use bitflags::bitflags;

// =============================================================================
// Validity
// =============================================================================

/// Local validation state of a segment.
///
/// Set to `Error` when a typed character is rejected by the configured
/// validator; reset to `Ok` on the next accepted edit. Consumed by the
/// rendering collaborator to pick an error style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Validity {
    /// Segment content passed validation (or no validator is configured).
    #[default]
    Ok,
    /// The last typed character was rejected by the validator.
    Error,
}

impl Validity {
    /// Check whether this is the error state.
    pub fn is_error(self) -> bool {
        self == Validity::Error
    }
}

// =============================================================================
// Segment Flags
// =============================================================================

bitflags! {
    /// Render-facing state of a segment, composed on demand.
    ///
    /// A renderer reads these to pick a visual style; the engine never
    /// interprets them itself.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SegmentFlags: u8 {
        /// Last input was rejected by the validator.
        const ERROR    = 1 << 0;
        /// Content should be drawn masked (secret mode).
        const MASKED   = 1 << 1;
        /// Segment cannot receive focus or input.
        const DISABLED = 1 << 2;
        /// Segment currently holds focus.
        const FOCUSED  = 1 << 3;
    }
}
