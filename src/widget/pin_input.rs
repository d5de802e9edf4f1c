//! PinInput - The sequence orchestrator.
//!
//! Owns the ordered collection of segment handles, interprets each
//! segment's intent events, performs focus transitions, assembles the
//! aggregate string, and fires `on_change`/`on_completed` to the host.
//!
//! The aggregate value is never stored: it is recomputed on demand by
//! polling every segment's content cell in slot order. Empty segments
//! contribute nothing (absence is not padded), so the aggregate is at most
//! `length` characters and reaches `length` exactly when every segment
//! holds one.
//!
//! Paste distribution runs on the deferred-task queue, one tick after the
//! event that carried it; the queued task verifies its segment handles
//! against the registry and degrades to a no-op if the widget was torn
//! down or remounted in the meantime.

use std::cell::RefCell;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

use crate::engine::arrays::{content, display};
use crate::engine::{get_id, is_allocated};
use crate::state::{defer, focus};
use crate::types::Validity;
use super::segment::{segment, SegmentHandle};
use super::types::{
    AggregateCallback, CharValidator, PinInputProps, PropValue,
    SegmentChangedFn, SegmentClearedFn, SegmentPasteFn, SegmentProps, SegmentRetreatFn,
};

// =============================================================================
// Segment Bookkeeping
// =============================================================================

/// A mounted segment plus the registry id it had at creation.
///
/// Deferred work re-checks the id so a recycled index is never written.
struct SegmentEntry {
    handle: SegmentHandle,
    id: Option<String>,
}

impl SegmentEntry {
    fn index(&self) -> usize {
        self.handle.index()
    }
}

type SegmentList = Rc<RefCell<Vec<SegmentEntry>>>;

/// Ordered concatenation of all segments' content.
fn assemble(entries: &[SegmentEntry]) -> String {
    entries.iter().map(|e| content::get_content(e.index())).collect()
}

fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Completion gate: every segment holds a character AND the cursor sits on
/// the last segment. The focus coupling is deliberate - it keeps completion
/// from firing while a middle segment is retyped or a paste is in flight.
fn maybe_complete(
    aggregate: &str,
    length: usize,
    last_index: usize,
    on_completed: &Option<AggregateCallback>,
) {
    if length == 0 {
        return;
    }
    if grapheme_len(aggregate) != length {
        return;
    }
    if focus::get_focused_index() != last_index as i32 {
        return;
    }
    if let Some(cb) = on_completed {
        cb(aggregate);
    }
}

// =============================================================================
// PinInput Widget
// =============================================================================

/// A mounted segmented PIN input.
///
/// Returned by [`pin_input`]. The host polls [`value`](PinInput::value),
/// swaps the segment set with [`set_length`](PinInput::set_length), and
/// tears everything down with [`unmount`](PinInput::unmount).
pub struct PinInput {
    segments: SegmentList,
    secret: PropValue<bool>,
    disabled: PropValue<bool>,
    validate: Option<CharValidator>,
    on_change: Option<AggregateCallback>,
    on_completed: Option<AggregateCallback>,
    auto_focus: bool,
}

/// Create a segmented PIN input widget.
///
/// Mounts `length` segments and, unless `auto_focus` is off, focuses the
/// first one. `length == 0` mounts a no-op widget with no segments.
pub fn pin_input(props: PinInputProps) -> PinInput {
    let widget = PinInput {
        segments: Rc::new(RefCell::new(Vec::new())),
        secret: props.secret,
        disabled: props.disabled,
        validate: props.validate,
        on_change: props.on_change,
        on_completed: props.on_completed,
        auto_focus: props.auto_focus,
    };
    widget.mount_segments(props.length);
    widget
}

impl PinInput {
    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.borrow().len()
    }

    /// True for the zero-length no-op widget.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current aggregate value, assembled by polling every segment.
    pub fn value(&self) -> String {
        assemble(&self.segments.borrow())
    }

    /// Arena index of the segment at `slot`, if it exists.
    pub fn segment_index(&self, slot: usize) -> Option<usize> {
        self.segments.borrow().get(slot).map(|e| e.index())
    }

    /// Replace the segment set with `length` fresh, empty segments.
    ///
    /// No identity persists: the old segments are destroyed, the new ones
    /// start empty, and auto-focus (if configured) lands on the new first
    /// segment.
    pub fn set_length(&mut self, length: usize) {
        focus::blur();
        self.segments.borrow_mut().clear();
        self.mount_segments(length);
    }

    /// Tear the widget down, releasing every segment.
    ///
    /// Deferred work still queued against the old segments becomes a no-op.
    pub fn unmount(self) {
        focus::blur();
        self.segments.borrow_mut().clear();
    }

    // =========================================================================
    // Mounting
    // =========================================================================

    fn mount_segments(&self, length: usize) {
        let changed = self.changed_intent();
        let cleared = self.cleared_intent();
        let retreat = self.retreat_intent();
        let paste = self.paste_intent();

        let mut entries = Vec::with_capacity(length);
        for slot in 0..length {
            let handle = segment(SegmentProps {
                id: None,
                slot,
                masked: self.secret.clone(),
                disabled: self.disabled.clone(),
                validate: self.validate.clone(),
                on_changed: Some(changed.clone()),
                on_cleared: Some(cleared.clone()),
                on_retreat: Some(retreat.clone()),
                on_paste: Some(paste.clone()),
            });
            let id = get_id(handle.index());
            entries.push(SegmentEntry { handle, id });
        }
        *self.segments.borrow_mut() = entries;

        if self.auto_focus {
            let first = self.segments.borrow().first().map(|e| e.index());
            if let Some(first) = first {
                focus::focus(first);
            }
        }
    }

    // =========================================================================
    // Intent Handlers
    // =========================================================================

    /// A segment committed a character: advance focus, emit the aggregate,
    /// and check the completion gate.
    fn changed_intent(&self) -> SegmentChangedFn {
        let segments = self.segments.clone();
        let validate = self.validate.clone();
        let on_change = self.on_change.clone();
        let on_completed = self.on_completed.clone();

        Rc::new(move |ch: &str, slot: usize| {
            // Re-validate as final authority; a rejected intent is dropped
            // silently (the segment already flagged itself)
            if let Some(ref validate) = validate {
                if !validate(ch) {
                    return;
                }
            }

            let (next, aggregate, length, last_index) = {
                let segs = segments.borrow();
                let length = segs.len();
                if slot >= length {
                    return;
                }
                let next = if slot + 1 < length {
                    Some(segs[slot + 1].index())
                } else {
                    None
                };
                (next, assemble(&segs), length, segs[length - 1].index())
            };

            if let Some(next) = next {
                focus::focus(next);
            }
            if let Some(ref cb) = on_change {
                cb(&aggregate);
            }
            maybe_complete(&aggregate, length, last_index, &on_completed);
        })
    }

    /// A segment deleted its character: emit the shortened aggregate.
    /// No focus move; the gate cannot be satisfied by a deletion.
    fn cleared_intent(&self) -> SegmentClearedFn {
        let segments = self.segments.clone();
        let on_change = self.on_change.clone();

        Rc::new(move |_slot: usize| {
            let aggregate = {
                let segs = segments.borrow();
                if segs.is_empty() {
                    return;
                }
                assemble(&segs)
            };
            if let Some(ref cb) = on_change {
                cb(&aggregate);
            }
        })
    }

    /// Backspace on an empty segment: move focus one slot left.
    fn retreat_intent(&self) -> SegmentRetreatFn {
        let segments = self.segments.clone();

        Rc::new(move |slot: usize| {
            let prev = {
                let segs = segments.borrow();
                if slot == 0 || slot >= segs.len() {
                    return;
                }
                segs[slot - 1].index()
            };
            focus::focus(prev);
        })
    }

    /// Pasted text at a slot: apply only on an exact fill of the remaining
    /// segments, one scheduler tick later, bypassing per-character
    /// validation.
    fn paste_intent(&self) -> SegmentPasteFn {
        let segments = self.segments.clone();
        let on_completed = self.on_completed.clone();

        Rc::new(move |text: &str, slot: usize| {
            let pieces: Vec<String> = text.graphemes(true).map(str::to_string).collect();
            if pieces.is_empty() {
                return;
            }

            // Shape guard is synchronous; only the distribution is deferred
            let targets: Vec<(usize, Option<String>)> = {
                let segs = segments.borrow();
                let length = segs.len();
                if slot >= length || pieces.len() != length - slot {
                    return;
                }
                segs[slot..].iter().map(|e| (e.index(), e.id.clone())).collect()
            };

            let segments = segments.clone();
            let on_completed = on_completed.clone();
            defer::defer(move || {
                // The widget may have been unmounted or remounted before
                // this tick ran; a stale handle makes the whole task a
                // benign no-op
                for (index, id) in &targets {
                    if !is_allocated(*index) || get_id(*index) != *id {
                        return;
                    }
                }

                for ((index, _), piece) in targets.iter().zip(&pieces) {
                    content::set_content(*index, piece.clone());
                    display::set_validity(*index, Validity::Ok);
                }

                if let Some((last_filled, _)) = targets.last() {
                    focus::focus(*last_filled);
                }

                let (aggregate, length, last_index) = {
                    let segs = segments.borrow();
                    if segs.is_empty() {
                        return;
                    }
                    (assemble(&segs), segs.len(), segs[segs.len() - 1].index())
                };
                maybe_complete(&aggregate, length, last_index, &on_completed);
            });
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::arrays::interaction;
    use crate::engine::reset_registry;
    use crate::state::clipboard;
    use crate::state::defer::reset_defer_state;
    use crate::state::focus::reset_focus_state;
    use crate::state::keyboard::{self, reset_keyboard_state, KeyboardEvent};
    use crate::types::SegmentFlags;
    use crate::widget::segment::segment_flags;
    use spark_signals::signal;
    use std::cell::Cell;

    fn setup() {
        reset_registry();
        reset_focus_state();
        reset_keyboard_state();
        reset_defer_state();
        clipboard::clear();
    }

    fn type_key(key: &str) {
        keyboard::dispatch(KeyboardEvent::new(key));
    }

    fn digits_only() -> CharValidator {
        Rc::new(|c: &str| c.chars().all(|ch| ch.is_ascii_digit()))
    }

    fn changes() -> (Rc<RefCell<Vec<String>>>, AggregateCallback) {
        let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        (log, Rc::new(move |value: &str| log_clone.borrow_mut().push(value.to_string())))
    }

    #[test]
    fn test_mount_focuses_first_segment() {
        setup();

        let widget = pin_input(PinInputProps { length: 4, ..Default::default() });

        assert_eq!(widget.len(), 4);
        assert_eq!(focus::get_focused_index(), widget.segment_index(0).unwrap() as i32);
    }

    #[test]
    fn test_sequential_typing_fills_and_completes() {
        setup();

        let (change_log, on_change) = changes();
        let (complete_log, on_completed) = changes();

        let widget = pin_input(PinInputProps {
            length: 4,
            on_change: Some(on_change),
            on_completed: Some(on_completed),
            ..Default::default()
        });

        type_key("1");
        type_key("2");
        type_key("3");
        type_key("4");

        assert_eq!(widget.value(), "1234");
        assert_eq!(*change_log.borrow(), vec!["1", "12", "123", "1234"]);
        assert_eq!(*complete_log.borrow(), vec!["1234"]);
        // Focus stayed on the last segment
        assert!(focus::is_focused(widget.segment_index(3).unwrap()));
    }

    #[test]
    fn test_rejected_char_flags_and_holds_focus() {
        setup();

        let (change_log, on_change) = changes();

        let widget = pin_input(PinInputProps {
            length: 4,
            validate: Some(digits_only()),
            on_change: Some(on_change),
            ..Default::default()
        });

        type_key("x");

        let first = widget.segment_index(0).unwrap();
        assert!(change_log.borrow().is_empty());
        assert!(segment_flags(first).contains(SegmentFlags::ERROR));
        assert!(focus::is_focused(first));
        assert_eq!(widget.value(), "");
    }

    #[test]
    fn test_backspace_retreats_and_stops_at_zero() {
        setup();

        let widget = pin_input(PinInputProps { length: 3, ..Default::default() });

        type_key("1");
        let second = widget.segment_index(1).unwrap();
        assert!(focus::is_focused(second));

        // Empty box: focus moves left
        type_key("Backspace");
        let first = widget.segment_index(0).unwrap();
        assert!(focus::is_focused(first));

        // Full box: clears first
        type_key("Backspace");
        assert_eq!(widget.value(), "");
        assert!(focus::is_focused(first));

        // Empty box at slot 0: no-op
        type_key("Backspace");
        assert!(focus::is_focused(first));
    }

    #[test]
    fn test_clear_emits_shortened_aggregate() {
        setup();

        let (change_log, on_change) = changes();
        let widget = pin_input(PinInputProps {
            length: 3,
            on_change: Some(on_change),
            ..Default::default()
        });

        type_key("1");
        type_key("2");
        // Move back onto slot 1 and delete its character
        type_key("Backspace"); // slot 2 empty -> focus slot 1
        type_key("Backspace"); // clears slot 1

        assert_eq!(widget.value(), "1");
        assert_eq!(*change_log.borrow(), vec!["1", "12", "1"]);
    }

    #[test]
    fn test_paste_exact_fill_is_deferred_then_applies() {
        setup();

        let (complete_log, on_completed) = changes();
        let widget = pin_input(PinInputProps {
            length: 6,
            on_completed: Some(on_completed),
            ..Default::default()
        });

        type_key("1");
        type_key("2");
        // Focus is on slot 2; paste exactly the 4 remaining characters
        keyboard::dispatch_paste("9876");

        // Nothing applied before the tick
        assert_eq!(widget.value(), "12");
        assert!(complete_log.borrow().is_empty());

        defer::flush();

        assert_eq!(widget.value(), "129876");
        let last = widget.segment_index(5).unwrap();
        assert!(focus::is_focused(last));
        assert_eq!(*complete_log.borrow(), vec!["129876"]);
    }

    #[test]
    fn test_paste_shape_mismatch_discarded() {
        setup();

        let widget = pin_input(PinInputProps { length: 6, ..Default::default() });

        keyboard::dispatch_paste("12");
        defer::flush();

        assert_eq!(widget.value(), "");
        let first = widget.segment_index(0).unwrap();
        assert!(focus::is_focused(first));
    }

    #[test]
    fn test_paste_skips_validation() {
        setup();

        let widget = pin_input(PinInputProps {
            length: 4,
            validate: Some(digits_only()),
            ..Default::default()
        });

        // Letters fail the validator but paste bypasses it
        keyboard::dispatch_paste("abcd");
        defer::flush();

        assert_eq!(widget.value(), "abcd");
    }

    #[test]
    fn test_paste_without_full_prefix_does_not_complete() {
        setup();

        let (complete_log, on_completed) = changes();
        let widget = pin_input(PinInputProps {
            length: 6,
            on_completed: Some(on_completed),
            ..Default::default()
        });

        // Slots 0 and 1 left empty; paste the last 4
        let third = widget.segment_index(2).unwrap();
        focus::focus(third);
        keyboard::dispatch_paste("9876");
        defer::flush();

        assert_eq!(widget.value(), "9876");
        // Focus did land on the last segment, but the aggregate is short
        assert!(complete_log.borrow().is_empty());
    }

    #[test]
    fn test_unmount_before_tick_makes_paste_noop() {
        setup();

        let widget = pin_input(PinInputProps { length: 4, ..Default::default() });

        keyboard::dispatch_paste("1234");
        assert_eq!(defer::pending(), 1);

        widget.unmount();
        defer::flush();

        assert!(!focus::has_focus());
        assert_eq!(crate::engine::get_allocated_count(), 0);
    }

    #[test]
    fn test_remount_before_tick_makes_paste_noop() {
        setup();

        let mut widget = pin_input(PinInputProps { length: 4, ..Default::default() });

        keyboard::dispatch_paste("1234");
        widget.set_length(4);
        defer::flush();

        // The new segments never saw the stale distribution
        assert_eq!(widget.value(), "");
    }

    #[test]
    fn test_completion_gate_blocks_middle_retype() {
        setup();

        let (complete_log, on_completed) = changes();
        let widget = pin_input(PinInputProps {
            length: 4,
            on_completed: Some(on_completed),
            ..Default::default()
        });

        type_key("a");
        type_key("b");
        type_key("c");
        type_key("d");
        assert_eq!(*complete_log.borrow(), vec!["abcd"]);

        // Host moves the cursor back to a middle segment and retypes
        let middle = widget.segment_index(1).unwrap();
        focus::focus(middle);
        type_key("Backspace"); // clears slot 1 -> "acd"
        type_key("x");          // commits at slot 1, focus advances to slot 2

        assert_eq!(widget.value(), "axcd");
        // Aggregate is full again but the cursor never reached the end
        assert_eq!(*complete_log.borrow(), vec!["abcd"]);
    }

    #[test]
    fn test_completion_can_fire_again() {
        setup();

        let (complete_log, on_completed) = changes();
        let widget = pin_input(PinInputProps {
            length: 2,
            on_completed: Some(on_completed),
            ..Default::default()
        });

        type_key("1");
        type_key("2");
        // Back out and retype to completion
        type_key("Backspace");
        type_key("2");

        assert_eq!(widget.value(), "12");
        assert_eq!(*complete_log.borrow(), vec!["12", "12"]);
    }

    #[test]
    fn test_disabled_toggle_is_uniform_and_preserves_state() {
        setup();

        let disabled = signal(false);
        let widget = pin_input(PinInputProps {
            length: 3,
            disabled: disabled.clone().into(),
            ..Default::default()
        });

        type_key("1");
        let focused_before = focus::get_focused_index();

        disabled.set(true);
        for slot in 0..3 {
            let index = widget.segment_index(slot).unwrap();
            assert!(!interaction::get_focusable(index));
            assert!(segment_flags(index).contains(SegmentFlags::DISABLED));
        }
        // Content and focus untouched
        assert_eq!(widget.value(), "1");
        assert_eq!(focus::get_focused_index(), focused_before);

        // No events while disabled
        type_key("2");
        assert_eq!(widget.value(), "1");

        disabled.set(false);
        type_key("2");
        assert_eq!(widget.value(), "12");
    }

    #[test]
    fn test_secret_toggle_is_uniform() {
        setup();

        let secret = signal(false);
        let widget = pin_input(PinInputProps {
            length: 2,
            secret: secret.clone().into(),
            ..Default::default()
        });

        type_key("7");
        secret.set(true);

        for slot in 0..2 {
            let index = widget.segment_index(slot).unwrap();
            assert!(segment_flags(index).contains(SegmentFlags::MASKED));
        }
        assert_eq!(widget.value(), "7");
    }

    #[test]
    fn test_zero_length_is_noop_widget() {
        setup();

        let widget = pin_input(PinInputProps { length: 0, ..Default::default() });

        assert!(widget.is_empty());
        assert_eq!(widget.value(), "");
        assert!(!focus::has_focus());

        type_key("1");
        keyboard::dispatch_paste("1234");
        defer::flush();
        assert_eq!(widget.value(), "");
    }

    #[test]
    fn test_set_length_replaces_segments_empty() {
        setup();

        let mut widget = pin_input(PinInputProps { length: 3, ..Default::default() });
        type_key("1");
        type_key("2");
        assert_eq!(widget.value(), "12");

        widget.set_length(5);

        assert_eq!(widget.len(), 5);
        assert_eq!(widget.value(), "");
        // Auto-focus landed on the new first segment
        let first = widget.segment_index(0).unwrap();
        assert!(focus::is_focused(first));
    }

    #[test]
    fn test_ctrl_v_paste_path() {
        setup();

        let on_completed_hits = Rc::new(Cell::new(0));
        let hits = on_completed_hits.clone();
        let widget = pin_input(PinInputProps {
            length: 4,
            on_completed: Some(Rc::new(move |_| hits.set(hits.get() + 1))),
            ..Default::default()
        });

        clipboard::copy("1234");
        keyboard::dispatch(KeyboardEvent::with_modifiers(
            "v",
            crate::state::keyboard::Modifiers::ctrl(),
        ));
        defer::flush();

        assert_eq!(widget.value(), "1234");
        assert_eq!(on_completed_hits.get(), 1);
    }

    #[test]
    fn test_orchestrator_revalidates_as_final_authority() {
        setup();

        // Orchestrator validator rejects everything; segment-level commit
        // still happens, but the intent is dropped: no focus move, no
        // aggregate emitted
        let (change_log, on_change) = changes();
        let widget = pin_input(PinInputProps {
            length: 3,
            on_change: Some(on_change),
            ..Default::default()
        });

        // Inject the intent directly, sidestepping the segment validator
        let reject_all: CharValidator = Rc::new(|_| false);
        let strict = PinInput {
            segments: widget.segments.clone(),
            secret: PropValue::Static(false),
            disabled: PropValue::Static(false),
            validate: Some(reject_all),
            on_change: None,
            on_completed: None,
            auto_focus: false,
        };
        let intent = strict.changed_intent();
        intent("5", 0);

        assert!(change_log.borrow().is_empty());
        let first = widget.segment_index(0).unwrap();
        assert!(focus::is_focused(first));
    }
}
