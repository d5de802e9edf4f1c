//! Keyboard Module - Keyboard/paste event state and handler registry.
//!
//! Does NOT own stdin (that is the input module).
//!
//! # API
//!
//! - `last_event` - Get last keyboard event
//! - `on(handler)` - Subscribe to all keyboard events
//! - `on_key(key, fn)` - Subscribe to a specific key
//! - `on_focused(i, fn)` - Subscribe when segment i has focus
//! - `on_paste(i, fn)` - Subscribe to paste text when segment i has focus
//! - `dispatch(event)` - Route an event: focused segment first, then
//!   key-specific, then global handlers
//! - `dispatch_paste(text)` - Route pasted text to the focused segment
//!
//! # Example
//!
//! ```ignore
//! use pinpad::state::keyboard;
//!
//! let cleanup = keyboard::on_focused(index, |event| {
//!     println!("Focused segment got: {}", event.key);
//!     false // Don't consume
//! });
//!
//! keyboard::dispatch(keyboard::KeyboardEvent::new("a"));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use spark_signals::{signal, Signal};

use super::focus;

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers.
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl.
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with shift.
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "Backspace").
    pub key: String,
    /// Modifier keys state.
    pub modifiers: Modifiers,
    /// Press/repeat/release state.
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event.
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_modifiers(key, Modifiers::none())
    }

    /// Create a key press with modifiers.
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Check if this is a press event.
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Box<dyn Fn(&KeyboardEvent) -> bool>;

/// Handler for a specific key. Return true to consume the event.
pub type KeySpecificHandler = Box<dyn Fn() -> bool>;

/// Handler for pasted text. Return true to consume the paste.
pub type PasteHandler = Box<dyn Fn(&str) -> bool>;

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Signal<Option<KeyboardEvent>> = signal(None);
}

/// Get the last keyboard event.
pub fn last_event() -> Option<KeyboardEvent> {
    LAST_EVENT.with(|s| s.get())
}

/// Get the last key pressed.
pub fn last_key() -> String {
    last_event().map(|e| e.key).unwrap_or_default()
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

/// Handlers keyed by something (key name, segment index), each entry tagged
/// with a registration id so cleanup can find it again.
type HandlerMap<K, H> = HashMap<K, Vec<(usize, H)>>;

fn register<K: Eq + Hash, H>(map: &mut HandlerMap<K, H>, key: K, id: usize, handler: H) {
    map.entry(key).or_default().push((id, handler));
}

fn unregister<K: Eq + Hash, H>(map: &mut HandlerMap<K, H>, key: &K, id: usize) {
    if let Some(handlers) = map.get_mut(key) {
        handlers.retain(|(handler_id, _)| *handler_id != id);
        if handlers.is_empty() {
            map.remove(key);
        }
    }
}

#[derive(Default)]
struct HandlerRegistry {
    global: Vec<(usize, KeyHandler)>,
    by_key: HandlerMap<String, KeySpecificHandler>,
    by_focus: HandlerMap<usize, KeyHandler>,
    paste: HandlerMap<usize, PasteHandler>,
    next_id: usize,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::default());
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a keyboard event through the priority chain.
///
/// Order: focused-segment handlers, then key-specific handlers, then global
/// handlers. Returns true if any handler consumed the event. Only press
/// events reach handlers; repeat/release only update `last_event`.
pub fn dispatch(event: KeyboardEvent) -> bool {
    LAST_EVENT.with(|s| s.set(Some(event.clone())));

    if !event.is_press() {
        return false;
    }

    dispatch_focused(focus::get_focused_index(), &event) || dispatch_to_handlers(&event)
}

/// Dispatch to key-specific and global handlers only (not focused).
pub fn dispatch_to_handlers(event: &KeyboardEvent) -> bool {
    REGISTRY.with(|reg| {
        let reg = reg.borrow();
        let by_key = reg
            .by_key
            .get(&event.key)
            .is_some_and(|handlers| handlers.iter().any(|(_, handler)| handler()));
        by_key || reg.global.iter().any(|(_, handler)| handler(event))
    })
}

/// Dispatch to focused-segment handlers. Returns true if consumed.
pub fn dispatch_focused(focused_index: i32, event: &KeyboardEvent) -> bool {
    if focused_index < 0 || !event.is_press() {
        return false;
    }

    REGISTRY.with(|reg| {
        reg.borrow()
            .by_focus
            .get(&(focused_index as usize))
            .is_some_and(|handlers| handlers.iter().any(|(_, handler)| handler(event)))
    })
}

/// Dispatch pasted text to the focused segment's paste handlers.
///
/// Used by the terminal bridge for bracketed paste; tests call it directly.
/// Returns true if a handler consumed the paste.
pub fn dispatch_paste(text: &str) -> bool {
    let focused = focus::get_focused_index();
    if focused < 0 {
        return false;
    }

    REGISTRY.with(|reg| {
        reg.borrow()
            .paste
            .get(&(focused as usize))
            .is_some_and(|handlers| handlers.iter().any(|(_, handler)| handler(text)))
    })
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to all keyboard events.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global.push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut().global.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to a specific key.
/// Handler receives no arguments - check last_event if needed.
/// Return true to consume the event.
/// Returns cleanup function.
pub fn on_key<F>(key: &str, handler: F) -> impl FnOnce()
where
    F: Fn() -> bool + 'static,
{
    let key = key.to_string();
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        register(&mut reg.by_key, key.clone(), id, Box::new(handler) as KeySpecificHandler);
        id
    });

    move || {
        REGISTRY.with(|reg| unregister(&mut reg.borrow_mut().by_key, &key, id));
    }
}

/// Subscribe to events when a specific segment has focus.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on_focused<F>(index: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        register(&mut reg.by_focus, index, id, Box::new(handler) as KeyHandler);
        id
    });

    move || {
        REGISTRY.with(|reg| unregister(&mut reg.borrow_mut().by_focus, &index, id));
    }
}

/// Subscribe to paste text delivered while a specific segment has focus.
/// Return true from handler to consume the paste.
/// Returns cleanup function.
pub fn on_paste<F>(index: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&str) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        register(&mut reg.paste, index, id, Box::new(handler) as PasteHandler);
        id
    });

    move || {
        REGISTRY.with(|reg| unregister(&mut reg.borrow_mut().paste, &index, id));
    }
}

/// Clean up all handlers for a segment index.
/// Called when a segment is released to prevent leaks.
pub fn cleanup_index(index: usize) {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.by_focus.remove(&index);
        reg.paste.remove(&index);
    });
}

/// Clear all state and handlers.
pub fn cleanup() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.global.clear();
        reg.by_key.clear();
        reg.by_focus.clear();
        reg.paste.clear();
    });
    LAST_EVENT.with(|s| s.set(None));
}

/// Reset keyboard state (for testing).
pub fn reset_keyboard_state() {
    cleanup();
    REGISTRY.with(|reg| reg.borrow_mut().next_id = 0);
}

// =============================================================================
// TESTS
// =============================================================================
