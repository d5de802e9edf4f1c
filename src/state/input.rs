//! Input Module - Terminal event bridge.
//!
//! Bridges crossterm's event system with the keyboard module. Provides
//! event polling, conversion, and routing, plus bracketed-paste capture so
//! terminal pastes arrive as a single text event instead of keystrokes.
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Dispatch event and flush the deferred-task queue
//! - `enable_paste_capture` / `disable_paste_capture` - Bracketed paste
//!
//! # Example
//!
//! ```ignore
//! use pinpad::state::input::{poll_event, route_event};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         route_event(event);
//!     }
//! }
//! ```

use crossterm::event::{
    Event as CrosstermEvent,
    KeyCode, KeyModifiers,
    KeyEvent as CrosstermKeyEvent,
    poll, read,
    EnableBracketedPaste, DisableBracketedPaste,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::defer;
use super::keyboard::{self, KeyboardEvent, KeyState, Modifiers};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type for the engine.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Keyboard event (key press, release, etc.)
    Key(KeyboardEvent),
    /// Bracketed paste text
    Paste(String),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Name of a non-character key, or "" for codes the engine ignores.
fn named_key(code: KeyCode) -> &'static str {
    match code {
        KeyCode::Enter => "Enter",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Esc => "Escape",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Insert => "Insert",
        _ => "",
    }
}

/// Convert crossterm KeyEvent to our KeyboardEvent.
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        code => named_key(code).to_string(),
    };

    let state = match event.kind {
        crossterm::event::KeyEventKind::Press => KeyState::Press,
        crossterm::event::KeyEventKind::Repeat => KeyState::Repeat,
        crossterm::event::KeyEventKind::Release => KeyState::Release,
    };

    // BackTab arrives as its own code with no SHIFT modifier set
    let mut modifiers = convert_modifiers(event.modifiers);
    if event.code == KeyCode::BackTab {
        modifiers.shift = true;
    }

    KeyboardEvent { key, modifiers, state }
}

/// Convert crossterm KeyModifiers to our Modifiers.
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: false, // Not exposed by crossterm
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    match read()? {
        CrosstermEvent::Key(key) => Ok(InputEvent::Key(convert_key_event(key))),
        CrosstermEvent::Paste(text) => Ok(InputEvent::Paste(text)),
        CrosstermEvent::Resize(w, h) => Ok(InputEvent::Resize(w, h)),
        _ => Ok(InputEvent::None),
    }
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route an event to the appropriate handler, then flush the deferred-task
/// queue (the "next tick" any handler scheduled work onto).
/// Returns true if any handler consumed the event.
pub fn route_event(event: InputEvent) -> bool {
    let consumed = match event {
        InputEvent::Key(key) => keyboard::dispatch(key),
        InputEvent::Paste(text) => keyboard::dispatch_paste(&text),
        InputEvent::Resize(_, _) => false,
        InputEvent::None => false,
    };

    defer::flush();

    consumed
}

// =============================================================================
// PASTE CAPTURE
// =============================================================================

/// Enable bracketed paste capture.
pub fn enable_paste_capture() -> std::io::Result<()> {
    execute!(stdout(), EnableBracketedPaste)
}

/// Disable bracketed paste capture.
pub fn disable_paste_capture() -> std::io::Result<()> {
    execute!(stdout(), DisableBracketedPaste)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_char_key() {
        let event = convert_key_event(CrosstermKeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::empty(),
        ));

        assert_eq!(event.key, "a");
        assert_eq!(event.state, KeyState::Press);
        assert!(!event.modifiers.ctrl);
        assert!(!event.modifiers.shift);
    }

    #[test]
    fn test_convert_named_keys() {
        let cases = [
            (KeyCode::Enter, "Enter"),
            (KeyCode::Backspace, "Backspace"),
            (KeyCode::Tab, "Tab"),
            (KeyCode::Esc, "Escape"),
            (KeyCode::Left, "ArrowLeft"),
            (KeyCode::Home, "Home"),
        ];

        for (code, expected) in cases {
            let event = convert_key_event(CrosstermKeyEvent::new(code, KeyModifiers::empty()));
            assert_eq!(event.key, expected);
        }
    }

    #[test]
    fn test_convert_modifiers() {
        let event = convert_key_event(CrosstermKeyEvent::new(
            KeyCode::Char('v'),
            KeyModifiers::CONTROL,
        ));

        assert_eq!(event.key, "v");
        assert!(event.modifiers.ctrl);
        assert!(!event.modifiers.alt);
    }

    #[test]
    fn test_back_tab_maps_to_shift_tab() {
        let event = convert_key_event(CrosstermKeyEvent::new(
            KeyCode::BackTab,
            KeyModifiers::empty(),
        ));

        assert_eq!(event.key, "Tab");
        assert!(event.modifiers.shift);
    }

    #[test]
    fn test_function_keys() {
        let event = convert_key_event(CrosstermKeyEvent::new(
            KeyCode::F(5),
            KeyModifiers::empty(),
        ));
        assert_eq!(event.key, "F5");
    }

    #[test]
    fn test_route_flushes_deferred_tasks() {
        use std::cell::Cell;
        use std::rc::Rc;

        defer::reset_defer_state();

        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();
        defer::defer(move || ran_clone.set(true));

        route_event(InputEvent::None);
        assert!(ran.get());
    }
}
