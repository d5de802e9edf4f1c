//! Global Keys Module - Global keyboard shortcuts.
//!
//! Provides global key handlers for:
//! - Ctrl+C: Graceful shutdown
//! - Tab / Shift+Tab: Focus cycling across segments
//!
//! These handlers are registered by the host and cleaned up on teardown.
//!
//! # Example
//!
//! ```ignore
//! use pinpad::state::global_keys;
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//!
//! let running = Arc::new(AtomicBool::new(true));
//! let handle = global_keys::setup_global_keys(running.clone());
//!
//! // Later, on cleanup:
//! handle.cleanup();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::focus;
use super::keyboard;

/// Cleanup handle for global key handlers.
pub struct GlobalKeysHandle {
    cleanups: Vec<Box<dyn FnOnce()>>,
}

impl GlobalKeysHandle {
    /// Clean up all global key handlers.
    pub fn cleanup(self) {
        for cleanup in self.cleanups {
            cleanup();
        }
    }
}

/// Set up global key handlers.
/// Returns a handle for cleanup.
///
/// # Arguments
/// * `running` - Atomic bool set to false on Ctrl+C
///
/// # Handlers
///
/// - **Ctrl+C**: Sets `running` to false for graceful shutdown
/// - **Tab**: `focus::focus_next()`
/// - **Shift+Tab**: `focus::focus_previous()`
pub fn setup_global_keys(running: Arc<AtomicBool>) -> GlobalKeysHandle {
    let quit_cleanup = keyboard::on(move |event| {
        if event.modifiers.ctrl && event.key == "c" {
            running.store(false, Ordering::SeqCst);
            true // Consume
        } else {
            false
        }
    });

    let tab_cleanup = keyboard::on(|event| {
        if event.key != "Tab" {
            return false;
        }
        if event.modifiers.shift {
            focus::focus_previous();
        } else {
            focus::focus_next();
        }
        true
    });

    GlobalKeysHandle {
        cleanups: vec![Box::new(quit_cleanup), Box::new(tab_cleanup)],
    }
}

// =============================================================================
// TESTS
// =============================================================================
