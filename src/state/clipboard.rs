//! Clipboard Module - Internal paste buffer.
//!
//! Holds text for Ctrl+V paste into the focused segment. Hosts that receive
//! text from elsewhere (bracketed paste goes through the input bridge
//! instead) can seed it with `copy`.
//!
//! # Example
//!
//! ```ignore
//! use pinpad::state::clipboard;
//!
//! clipboard::copy("1234");
//!
//! if let Some(text) = clipboard::paste() {
//!     println!("Pasted: {}", text);
//! }
//! ```

use std::cell::RefCell;

thread_local! {
    /// Internal clipboard buffer.
    static CLIPBOARD_BUFFER: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Copy text to the clipboard.
///
/// Empty strings are ignored (clipboard not modified).
pub fn copy(text: &str) {
    if text.is_empty() {
        return;
    }

    CLIPBOARD_BUFFER.with(|buf| {
        *buf.borrow_mut() = Some(text.to_string());
    });
}

/// Paste text from the clipboard.
///
/// Returns the most recently copied text, or None if the clipboard is empty.
/// Non-destructive: pasting again returns the same text.
pub fn paste() -> Option<String> {
    CLIPBOARD_BUFFER.with(|buf| {
        buf.borrow().clone()
    })
}

/// Clear the clipboard.
pub fn clear() {
    CLIPBOARD_BUFFER.with(|buf| {
        *buf.borrow_mut() = None;
    });
}

/// Check if the clipboard has content.
pub fn has_content() -> bool {
    CLIPBOARD_BUFFER.with(|buf| {
        buf.borrow().is_some()
    })
}
