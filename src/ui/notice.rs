//! Terminal rendering of toast notifications.

use console::style;

use crate::notify::Notification;
use crate::ui::icons::{CHECK, CROSS};

/// One-line rendering: icon, bold title, then the description if any.
pub fn format_notification(note: &Notification) -> String {
    let (icon, title) = if note.is_error() {
        (CROSS, style(&note.title).red().bold())
    } else {
        (CHECK, style(&note.title).green().bold())
    };
    match &note.description {
        Some(desc) => format!("{}{}: {}", icon, title, desc),
        None => format!("{}{}", icon, title),
    }
}

/// Success notices go to stdout, errors to stderr.
pub fn print_notification(note: &Notification) {
    if note.is_error() {
        eprintln!("{}", format_notification(note));
    } else {
        println!("{}", format_notification(note));
    }
}

pub fn print_all(notes: &[Notification]) {
    for note in notes {
        print_notification(note);
    }
}
