//! Widget Module - The segmented PIN input.
//!
//! Two layers, leaf-first:
//!
//! - [`segment`] - A single character box: local validation, input
//!   normalization, intent events
//! - [`pin_input`] - The sequence orchestrator: focus transitions,
//!   aggregate assembly, host callbacks

mod pin_input;
mod segment;
mod types;

pub use pin_input::{pin_input, PinInput};
pub use segment::{segment, segment_flags, SegmentHandle};
pub use types::{
    AggregateCallback, CharValidator, Cleanup, PinInputProps, PropValue,
    SegmentChangedFn, SegmentClearedFn, SegmentPasteFn, SegmentProps, SegmentRetreatFn,
};
