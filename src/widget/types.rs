//! Widget types - Props and callbacks.
//!
//! Props support static values, signals, and getters for reactivity:
//! a `Signal`/`Getter`-backed prop propagates host-side changes into every
//! segment without remounting anything.

use std::rc::Rc;
use spark_signals::Signal;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Per-character validator.
///
/// Receives the normalized candidate character (one grapheme cluster) and
/// returns whether it is acceptable.
///
/// Using Rc<dyn Fn> instead of Box<dyn Fn> allows cloning callbacks
/// into closures without ownership issues.
pub type CharValidator = Rc<dyn Fn(&str) -> bool>;

/// Aggregate value callback (`on_change` / `on_completed`).
pub type AggregateCallback = Rc<dyn Fn(&str)>;

/// Segment intent: a character was committed at a slot.
pub type SegmentChangedFn = Rc<dyn Fn(&str, usize)>;

/// Segment intent: the character at a slot was deleted.
pub type SegmentClearedFn = Rc<dyn Fn(usize)>;

/// Segment intent: backspace on an already-empty slot (move focus left).
pub type SegmentRetreatFn = Rc<dyn Fn(usize)>;

/// Segment intent: pasted text arrived at a slot.
pub type SegmentPasteFn = Rc<dyn Fn(&str, usize)>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// When bound to an array cell the reactive connection is preserved, so a
/// host-side `Signal` update reaches every segment that reads the prop.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time the value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

// =============================================================================
// Segment Props
// =============================================================================

/// Properties for a single segment (one character box).
///
/// Segments are normally created by [`pin_input`](crate::widget::pin_input);
/// the intent callbacks report to the owning orchestrator, which performs
/// all cross-segment effects.
#[derive(Default)]
pub struct SegmentProps {
    /// Optional segment ID for lookup.
    pub id: Option<String>,

    /// Position within the owning sequence, `[0, length)`.
    pub slot: usize,

    /// Masked (secret) display mode.
    pub masked: PropValue<bool>,

    /// Disabled segments are not focusable and emit no events.
    pub disabled: PropValue<bool>,

    /// Per-character validator applied before committing a keystroke.
    pub validate: Option<CharValidator>,

    /// A character was committed.
    pub on_changed: Option<SegmentChangedFn>,

    /// The stored character was deleted by backspace.
    pub on_cleared: Option<SegmentClearedFn>,

    /// Backspace on an empty slot - pure "move focus left" intent.
    pub on_retreat: Option<SegmentRetreatFn>,

    /// Pasted text arrived; the segment consumes none of it locally.
    pub on_paste: Option<SegmentPasteFn>,
}

// =============================================================================
// PinInput Props
// =============================================================================

/// Properties for the segmented PIN input widget.
///
/// # Example
///
/// ```ignore
/// use std::rc::Rc;
/// use pinpad::{pin_input, PinInputProps};
///
/// let widget = pin_input(PinInputProps {
///     length: 6,
///     validate: Some(Rc::new(|c| c.chars().all(|ch| ch.is_ascii_digit()))),
///     on_completed: Some(Rc::new(|pin| println!("done: {pin}"))),
///     ..Default::default()
/// });
/// ```
pub struct PinInputProps {
    /// Number of segments (default 5). Zero mounts a no-op widget.
    pub length: usize,

    /// Masked display mode. Reactive: toggling a signal-backed value flips
    /// every segment without resetting content or focus.
    pub secret: PropValue<bool>,

    /// Disable the whole widget. Reactive, same contract as `secret`.
    pub disabled: PropValue<bool>,

    /// Per-character validator, applied at the segment and re-checked by the
    /// orchestrator as final authority.
    pub validate: Option<CharValidator>,

    /// Called with the aggregate value on every accepted single-character
    /// change (commit or clear).
    pub on_change: Option<AggregateCallback>,

    /// Called with the aggregate value each time every segment holds a
    /// character while focus sits on the last segment. May fire again after
    /// the user backs out and retypes to completion.
    pub on_completed: Option<AggregateCallback>,

    /// Focus segment 0 on mount (default true).
    pub auto_focus: bool,
}

impl Default for PinInputProps {
    fn default() -> Self {
        Self {
            length: 5,
            secret: PropValue::Static(false),
            disabled: PropValue::Static(false),
            validate: None,
            on_change: None,
            on_completed: None,
            auto_focus: true,
        }
    }
}
