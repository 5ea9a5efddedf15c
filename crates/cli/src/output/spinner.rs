use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

use super::OutputMode;

pub fn create(msg: &str) -> ProgressBar {
    let sp = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg}") {
        sp.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]));
    }
    sp.set_message(msg.to_string());
    sp.enable_steady_tick(Duration::from_millis(80));
    sp
}

pub fn finish_err(sp: &ProgressBar, msg: &str) {
    if let Ok(style) = ProgressStyle::with_template("{msg}") {
        sp.set_style(style);
    }
    sp.finish_with_message(format!("{} {}", "✗".red().bold(), msg));
}

pub fn finish_clear(sp: &ProgressBar) {
    sp.finish_and_clear();
}

/// Runs `fut` behind a spinner in human mode; JSON mode stays silent.
pub async fn with_spinner<T, E, F>(mode: OutputMode, msg: &str, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let sp = mode.is_human().then(|| create(msg));
    let res = fut.await;
    if let Some(sp) = sp {
        match &res {
            Ok(_) => finish_clear(&sp),
            Err(_) => finish_err(&sp, msg.trim_end_matches('.')),
        }
    }
    res
}
