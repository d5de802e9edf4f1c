//! Interactive Example - A 6-digit PIN widget driven from a real terminal.
//!
//! Digits fill the boxes, Backspace walks left, a terminal paste of exactly
//! the remaining characters fans out across the boxes. F2 toggles secret
//! mode, F3 toggles disabled, Ctrl+C exits. The widget disables itself on
//! completion, like a form that locks after submit.
//!
//! Run with: cargo run --example interactive

use std::io::{stdout, Write};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use spark_signals::signal;

use pinpad::engine::arrays::content;
use pinpad::state::input::{self, poll_event};
use pinpad::{global_keys, keyboard, pin_input, segment_flags, PinInput, PinInputProps, SegmentFlags};

fn draw(widget: &PinInput) -> std::io::Result<()> {
    let mut line = String::new();

    for slot in 0..widget.len() {
        let Some(index) = widget.segment_index(slot) else {
            continue;
        };
        let flags = segment_flags(index);
        let stored = content::get_content(index);

        let shown = if stored.is_empty() {
            '_'
        } else if flags.contains(SegmentFlags::MASKED) {
            '•'
        } else {
            stored.chars().next().unwrap_or('_')
        };

        let marker = if flags.contains(SegmentFlags::ERROR) { '!' } else { ' ' };
        if flags.contains(SegmentFlags::FOCUSED) {
            line.push_str(&format!("[{shown}{marker}]"));
        } else {
            line.push_str(&format!(" {shown}{marker} "));
        }
    }

    let status = if widget.len() > 0 && widget.value().chars().count() == widget.len() {
        format!("done: {}", widget.value())
    } else {
        String::from("digits | Backspace | paste | F2 secret | F3 disable | Ctrl+C quit")
    };

    print!("\r{line}  {status}\x1b[K");
    stdout().flush()
}

fn main() -> std::io::Result<()> {
    enable_raw_mode()?;
    input::enable_paste_capture()?;

    let secret = signal(false);
    let disabled = signal(false);

    let widget = pin_input(PinInputProps {
        length: 6,
        secret: secret.clone().into(),
        disabled: disabled.clone().into(),
        validate: Some(Rc::new(|c: &str| c.chars().all(|ch| ch.is_ascii_digit()))),
        on_completed: Some(Rc::new({
            let disabled = disabled.clone();
            move |_pin: &str| {
                // Lock the widget once the code is complete
                disabled.set(true);
            }
        })),
        ..Default::default()
    });

    let running = Arc::new(AtomicBool::new(true));
    let keys = global_keys::setup_global_keys(running.clone());

    let _secret_toggle = keyboard::on_key("F2", {
        let secret = secret.clone();
        move || {
            secret.set(!secret.get());
            true
        }
    });
    let _disabled_toggle = keyboard::on_key("F3", {
        let disabled = disabled.clone();
        move || {
            disabled.set(!disabled.get());
            true
        }
    });

    draw(&widget)?;
    while running.load(Ordering::SeqCst) {
        if let Some(event) = poll_event(Duration::from_millis(33))? {
            input::route_event(event);
            draw(&widget)?;
        }
    }

    keys.cleanup();
    widget.unmount();
    input::disable_paste_capture()?;
    disable_raw_mode()?;
    println!();
    Ok(())
}
