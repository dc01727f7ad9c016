use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;

static PLAIN_MODE: AtomicBool = AtomicBool::new(false);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Header,
    Success,
    Warning,
    Error,
}

/// Turns colors and icons off for every formatter in the process.
pub fn set_plain_mode(plain: bool) {
    PLAIN_MODE.store(plain, Ordering::Relaxed);
    if plain {
        colored::control::set_override(false);
    } else {
        colored::control::unset_override();
    }
}

pub fn is_plain_mode() -> bool {
    PLAIN_MODE.load(Ordering::Relaxed)
}

pub fn header_text(title: impl fmt::Display) -> String {
    colorize(format!("=== {title} ==="), Style::Header)
}

/// `--- Title ---` sub-heading used inside flows.
pub fn section_text(title: impl fmt::Display) -> String {
    format!("--- {title} ---")
}

pub fn success_text(message: impl fmt::Display) -> String {
    decorate("✔", "OK:", message, Style::Success)
}

pub fn warning_text(message: impl fmt::Display) -> String {
    decorate("⚠", "WARNING:", message, Style::Warning)
}

pub fn error_text(message: impl fmt::Display) -> String {
    decorate("✖", "ERROR:", message, Style::Error)
}

fn decorate(icon: &str, plain_label: &str, message: impl fmt::Display, style: Style) -> String {
    if is_plain_mode() {
        format!("{plain_label} {message}")
    } else {
        colorize(format!("{icon} {message}"), style)
    }
}

fn colorize(text: String, style: Style) -> String {
    if is_plain_mode() {
        return text;
    }
    match style {
        Style::Success => text.green().to_string(),
        Style::Warning => text.yellow().to_string(),
        Style::Error => text.red().to_string(),
        Style::Header => text.bold().to_string(),
    }
}
