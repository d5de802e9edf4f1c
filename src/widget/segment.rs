//! Segment - A single character box.
//!
//! Owns one slot's local validity state, normalizes raw keyboard input to at
//! most one character, applies the optional per-character validator, and
//! raises intent events upward. A segment never mutates its siblings; the
//! orchestrator is the only writer of cross-segment effects.
//!
//! Rejection policy is flag-not-revert: a character the validator refuses
//! sets `Validity::Error` and is never committed, while the previously
//! stored character stays in place.

use unicode_segmentation::UnicodeSegmentation;

use crate::engine::arrays::{content, core, display, interaction};
use crate::engine::{allocate_index, release_index};
use crate::state::{clipboard, focus, keyboard};
use crate::types::{SegmentFlags, Validity};
use super::types::{Cleanup, SegmentProps, PropValue};

// =============================================================================
// Input Normalization
// =============================================================================

/// Keys that carry editing/navigation semantics rather than text.
fn is_named_key(key: &str) -> bool {
    matches!(
        key,
        "Enter" | "Tab" | "Backspace" | "Delete" | "Escape" | "Insert"
            | "Home" | "End" | "PageUp" | "PageDown"
            | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight"
    ) || (key.len() >= 2
        && key.starts_with('F')
        && key[1..].chars().all(|c| c.is_ascii_digit()))
}

/// Normalize a raw key value to at most one character: the LAST grapheme
/// cluster wins. Fast typing or IME batching can deliver several characters
/// in one event value; everything but the final one is discarded.
fn normalize(value: &str) -> Option<&str> {
    value.graphemes(true).next_back()
}

// =============================================================================
// Segment Handle
// =============================================================================

/// Handle to a mounted segment.
///
/// Dropping the handle unmounts the segment: its keyboard handlers are
/// removed and its arena index is released (clearing the array cells).
pub struct SegmentHandle {
    index: usize,
    cleanup: Option<Cleanup>,
}

impl SegmentHandle {
    /// Arena index of this segment.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Unmount explicitly.
    pub fn unmount(mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for SegmentHandle {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

// =============================================================================
// Segment Component
// =============================================================================

/// Create a single character box.
///
/// Registers a keyboard handler that fires while the segment has focus and
/// a paste handler for text arriving at it. All cross-segment behavior is
/// delegated upward through the intent callbacks in [`SegmentProps`].
pub fn segment(props: SegmentProps) -> SegmentHandle {
    let index = allocate_index(props.id.as_deref());
    let slot = props.slot;

    core::set_slot(index, slot);
    display::set_validity(index, Validity::Ok);

    // Masked display mode, bound reactively
    match props.masked {
        PropValue::Static(v) => display::set_masked(index, v),
        PropValue::Signal(s) => display::set_masked_getter(index, move || s.get()),
        PropValue::Getter(g) => display::set_masked_getter(index, move || g()),
    }

    // focusable = !disabled, bound reactively
    match props.disabled {
        PropValue::Static(v) => interaction::set_focusable(index, !v),
        PropValue::Signal(s) => interaction::set_focusable_getter(index, move || !s.get()),
        PropValue::Getter(g) => interaction::set_focusable_getter(index, move || !g()),
    }

    // ==========================================================================
    // KEYBOARD HANDLER
    // ==========================================================================

    let validate = props.validate.clone();
    let on_changed = props.on_changed.clone();
    let on_cleared = props.on_cleared.clone();
    let on_retreat = props.on_retreat.clone();
    let on_paste = props.on_paste.clone();

    let key_cleanup = keyboard::on_focused(index, move |event| {
        // Disabled: no events leave this segment
        if !interaction::get_focusable(index) {
            return false;
        }

        // Ctrl+V - forward the clipboard buffer as a paste intent
        if event.modifiers.ctrl && (event.key == "v" || event.key == "V") {
            if let Some(text) = clipboard::paste() {
                if let Some(ref cb) = on_paste {
                    cb(&text, slot);
                }
            }
            return true;
        }

        if event.key == "Backspace" {
            if content::has_content(index) {
                // Native deletion inside this box
                content::set_content(index, String::new());
                display::set_validity(index, Validity::Ok);
                if let Some(ref cb) = on_cleared {
                    cb(slot);
                }
            } else if slot > 0 {
                // Already empty: pure "move focus left" intent
                if let Some(ref cb) = on_retreat {
                    cb(slot);
                }
            }
            return true;
        }

        // Text input
        if event.modifiers.ctrl || event.modifiers.alt || event.modifiers.meta {
            return false;
        }
        if is_named_key(&event.key) {
            return false;
        }
        let Some(ch) = normalize(&event.key) else {
            return false;
        };

        if let Some(ref validate) = validate {
            if !validate(ch) {
                // Reject-and-flag: nothing committed, nothing forwarded
                display::set_validity(index, Validity::Error);
                return true;
            }
        }

        display::set_validity(index, Validity::Ok);
        content::set_content(index, ch.to_string());
        if let Some(ref cb) = on_changed {
            cb(ch, slot);
        }
        true
    });

    // ==========================================================================
    // PASTE HANDLER (bracketed paste routed to the focused segment)
    // ==========================================================================

    let on_paste = props.on_paste.clone();
    let paste_cleanup = keyboard::on_paste(index, move |text| {
        if !interaction::get_focusable(index) {
            return false;
        }
        if let Some(ref cb) = on_paste {
            cb(text, slot);
        }
        true
    });

    // ==========================================================================
    // CLEANUP
    // ==========================================================================

    SegmentHandle {
        index,
        cleanup: Some(Box::new(move || {
            key_cleanup();
            paste_cleanup();
            keyboard::cleanup_index(index);
            release_index(index);
        })),
    }
}

// =============================================================================
// Render Accessor
// =============================================================================

/// Compose the render-facing flags for a segment.
///
/// The rendering collaborator reads this (plus `content::get_content`) to
/// draw a box; the engine attaches no meaning to the flags itself.
pub fn segment_flags(index: usize) -> SegmentFlags {
    let mut flags = SegmentFlags::empty();
    if display::get_validity(index).is_error() {
        flags |= SegmentFlags::ERROR;
    }
    if display::get_masked(index) {
        flags |= SegmentFlags::MASKED;
    }
    if !interaction::get_focusable(index) {
        flags |= SegmentFlags::DISABLED;
    }
    if focus::is_focused(index) {
        flags |= SegmentFlags::FOCUSED;
    }
    flags
}

// =============================================================================
// Tests
// =============================================================================
