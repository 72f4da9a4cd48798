//! Format - Terminal Rendering Utilities

use std::time::Duration;

use crate::domain::media::{MediaRef, Playback};
use crate::sequencer::{ResultLine, SequencerView, TabView};

const BAR_WIDTH: usize = 20;

/// Format a duration as milliseconds
pub fn format_ms(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}

/// Truncate a string to `max_chars` characters with ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{head}...")
    }
}

/// Text progress bar, `fraction` clamped to `0.0..=1.0`
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let filled = (fraction * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One tab label: `*name*` when active, `name✓` when complete
pub fn format_tab(tab: &TabView) -> String {
    let mut label = if tab.active {
        format!("*{}*", tab.name)
    } else {
        tab.name.clone()
    };
    if tab.complete {
        label.push('✓');
    } else if tab.active {
        label.push_str(&format!(" {:.0}%", tab.ring * 100.0));
    }
    label
}

/// How a media reference would be presented
pub fn format_media(media: &MediaRef) -> String {
    match media.playback() {
        Playback::Still => format!("image {}", media.locator()),
        Playback::Video {
            looping,
            muted,
            autoplay,
        } => {
            let mut flags = Vec::new();
            if looping {
                flags.push("loop");
            }
            if muted {
                flags.push("muted");
            }
            if autoplay {
                flags.push("autoplay");
            }
            format!("video {} ({})", media.locator(), flags.join(", "))
        }
    }
}

/// Single status line for a playing sequencer
pub fn format_view(view: &SequencerView) -> String {
    let tabs: Vec<String> = view.tabs.iter().map(format_tab).collect();
    let caret = if view.caret_visible { "|" } else { "" };
    let status = match &view.result {
        ResultLine::Hidden => String::new(),
        ResultLine::Pending => " ...".to_string(),
        ResultLine::Ready(result) => format!(" => {}", truncate(result, 60)),
    };
    let media = view
        .media
        .as_ref()
        .map(|media| format!(" [{}]", format_media(media)))
        .unwrap_or_default();
    format!(
        "{} {} > {}{}{}{}",
        tabs.join(" | "),
        progress_bar(view.progress, BAR_WIDTH),
        view.typed_text,
        caret,
        status,
        media
    )
}
