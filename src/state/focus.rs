//! Focus System - Which segment owns the cursor.
//!
//! Manages focus state and navigation:
//! - `focused_index` signal (currently focused segment)
//! - Focus cycling in slot order (Tab/Shift+Tab)
//! - Focus callbacks (on_focus/on_blur)
//!
//! The completion gate of the orchestrator reads `get_focused_index()`
//! directly; a host that moves focus programmatically therefore changes
//! when completion can fire.
//!
//! # Example
//!
//! ```ignore
//! use pinpad::state::focus;
//!
//! focus::focus(segment_index);
//! focus::focus_next();
//! focus::blur();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use spark_signals::{signal, Signal};

use crate::engine::arrays::{core, interaction};
use crate::engine::{get_allocated_indices, is_allocated};

// =============================================================================
// FOCUSED INDEX SIGNAL
// =============================================================================

thread_local! {
    static FOCUSED_INDEX: Signal<i32> = signal(-1);
}

/// Get the currently focused segment index (-1 if none).
pub fn get_focused_index() -> i32 {
    FOCUSED_INDEX.with(|s| s.get())
}

/// Check if any segment is focused.
pub fn has_focus() -> bool {
    get_focused_index() >= 0
}

/// Check if a specific segment is focused.
pub fn is_focused(index: usize) -> bool {
    get_focused_index() == index as i32
}

// =============================================================================
// FOCUS CALLBACKS
// =============================================================================

/// Callbacks fired when focus changes.
#[derive(Default)]
pub struct FocusCallbacks {
    pub on_focus: Option<Box<dyn Fn()>>,
    pub on_blur: Option<Box<dyn Fn()>>,
}

thread_local! {
    static CALLBACKS: RefCell<HashMap<usize, Vec<(usize, FocusCallbacks)>>> =
        RefCell::new(HashMap::new());
    static CALLBACK_ID: RefCell<usize> = const { RefCell::new(0) };
}

/// Register focus callbacks for a segment.
/// Returns cleanup function to unregister.
pub fn register_callbacks(index: usize, callbacks: FocusCallbacks) -> impl FnOnce() {
    let id = CALLBACK_ID.with(|counter| {
        let mut counter = counter.borrow_mut();
        *counter += 1;
        *counter
    });

    CALLBACKS.with(|reg| {
        reg.borrow_mut().entry(index).or_default().push((id, callbacks));
    });

    move || {
        CALLBACKS.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.get_mut(&index) {
                list.retain(|(entry_id, _)| *entry_id != id);
                if list.is_empty() {
                    reg.remove(&index);
                }
            }
        });
    }
}

fn fire_blur(index: usize) {
    CALLBACKS.with(|reg| {
        if let Some(list) = reg.borrow().get(&index) {
            for (_, cb) in list {
                if let Some(ref on_blur) = cb.on_blur {
                    on_blur();
                }
            }
        }
    });
}

fn fire_focus(index: usize) {
    CALLBACKS.with(|reg| {
        if let Some(list) = reg.borrow().get(&index) {
            for (_, cb) in list {
                if let Some(ref on_focus) = cb.on_focus {
                    on_focus();
                }
            }
        }
    });
}

/// Internal: update the signal and fire blur/focus callbacks at the source.
fn move_focus(new_index: i32) {
    let old_index = get_focused_index();
    if old_index == new_index {
        return;
    }

    if old_index >= 0 {
        fire_blur(old_index as usize);
    }
    FOCUSED_INDEX.with(|s| s.set(new_index));
    if new_index >= 0 {
        fire_focus(new_index as usize);
    }
}

// =============================================================================
// FOCUSABLE QUERIES
// =============================================================================

/// Get all focusable segment indices, sorted by slot position.
///
/// Segments sharing a slot keep allocation order.
pub fn get_focusable_indices() -> Vec<usize> {
    let mut ring: Vec<usize> = get_allocated_indices()
        .into_iter()
        .filter(|&i| interaction::get_focusable(i))
        .collect();
    ring.sort_by_key(|&i| (core::get_slot(i), i));
    ring
}

// =============================================================================
// FOCUS NAVIGATION
// =============================================================================

/// The segment a step in `forward`/backward direction would land on,
/// wrapping at the ends. None when nothing is focusable.
fn step(forward: bool) -> Option<usize> {
    let ring = get_focusable_indices();
    if ring.is_empty() {
        return None;
    }

    let current = get_focused_index();
    let target = match ring.iter().position(|&i| i as i32 == current) {
        None if forward => 0,
        None => ring.len() - 1,
        Some(pos) if forward => (pos + 1) % ring.len(),
        Some(pos) => (pos + ring.len() - 1) % ring.len(),
    };
    Some(ring[target])
}

/// Move focus to the next focusable segment.
pub fn focus_next() -> bool {
    match step(true) {
        Some(next) if next as i32 != get_focused_index() => {
            move_focus(next as i32);
            true
        }
        _ => false,
    }
}

/// Move focus to the previous focusable segment.
pub fn focus_previous() -> bool {
    match step(false) {
        Some(prev) if prev as i32 != get_focused_index() => {
            move_focus(prev as i32);
            true
        }
        _ => false,
    }
}

/// Focus a specific segment by index.
pub fn focus(index: usize) -> bool {
    if is_allocated(index) && interaction::get_focusable(index) {
        move_focus(index as i32);
        return true;
    }
    false
}

/// Clear focus (no segment focused).
pub fn blur() {
    move_focus(-1);
}

/// Focus the first focusable segment.
pub fn focus_first() -> bool {
    get_focusable_indices().first().is_some_and(|&index| focus(index))
}

/// Focus the last focusable segment.
pub fn focus_last() -> bool {
    get_focusable_indices().last().is_some_and(|&index| focus(index))
}

// =============================================================================
// RESET (for testing)
// =============================================================================

/// Reset all focus state (for testing).
pub fn reset_focus_state() {
    move_focus(-1);
    CALLBACKS.with(|reg| reg.borrow_mut().clear());
}

// =============================================================================
// TESTS
// =============================================================================
