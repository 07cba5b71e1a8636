use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a list is loading. Draws nothing when stderr is not
/// a terminal.
pub fn loading(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
