//! # pinpad
//!
//! Segmented PIN/code input engine for terminal UIs.
//!
//! A row of N single-character boxes ("segments") that behave as one
//! logical input of fixed length. The crate is the focus-and-input
//! orchestration engine only: it decides, for every keystroke, backspace,
//! and paste, how per-segment state changes, where focus moves, what
//! aggregate value to report, and when the input is complete. Drawing the
//! boxes is the host's job - it reads the reactive per-segment state
//! (content, [`SegmentFlags`]) and styles them however it likes.
//!
//! ## Architecture
//!
//! Segments are indices into columnar reactive arrays rather than objects,
//! built on [spark-signals](https://github.com/RLabs-Inc/spark-signals)
//! for fine-grained reactivity:
//!
//! ```text
//! terminal event → input bridge → keyboard dispatch → focused segment
//!     → intent event → orchestrator (focus move + aggregate) → host callbacks
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use pinpad::{pin_input, PinInputProps};
//!
//! let widget = pin_input(PinInputProps {
//!     length: 6,
//!     validate: Some(Rc::new(|c| c.chars().all(|ch| ch.is_ascii_digit()))),
//!     on_change: Some(Rc::new(|pin| println!("so far: {pin}"))),
//!     on_completed: Some(Rc::new(|pin| println!("done: {pin}"))),
//!     ..Default::default()
//! });
//!
//! // Host event loop
//! // while let Ok(Some(event)) = pinpad::input::poll_event(timeout) {
//! //     pinpad::input::route_event(event);
//! // }
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types ([`Validity`], [`SegmentFlags`])
//! - [`engine`] - Segment registry and parallel arrays
//! - [`state`] - Focus, keyboard, clipboard, deferred tasks, terminal bridge
//! - [`widget`] - The segment and orchestrator components

pub mod engine;
pub mod state;
pub mod types;
pub mod widget;

// Re-export commonly used items
pub use types::{SegmentFlags, Validity};

pub use engine::{
    allocate_index, release_index, get_id, get_index,
    get_allocated_indices, get_allocated_count, is_allocated,
    reset_registry,
};

pub use state::{clipboard, defer, focus, global_keys, input, keyboard};

pub use state::keyboard::{KeyboardEvent, KeyState, Modifiers};

pub use widget::{
    pin_input, segment, segment_flags,
    AggregateCallback, CharValidator, Cleanup, PinInput, PinInputProps,
    PropValue, SegmentHandle, SegmentProps,
};
