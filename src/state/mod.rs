//! State Module - Runtime state management systems.
//!
//! The reactive state systems the widget sits on:
//!
//! - **Focus** - Focused-segment signal, slot-order cycling, callbacks
//! - **Keyboard** - Event types, handler registry, dispatch router
//! - **Clipboard** - Internal paste buffer for Ctrl+V
//! - **Defer** - Deferred task queue (the paste-distribution tick)
//! - **Input** - crossterm event bridge, bracketed-paste capture
//! - **Global keys** - Tab cycling and Ctrl+C shutdown

pub mod clipboard;
pub mod defer;
pub mod focus;
pub mod global_keys;
pub mod input;
pub mod keyboard;
