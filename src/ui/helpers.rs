use anyhow::{anyhow, Error, Result};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::models::Bookmark;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Last non-blank line of a multi-line message, without a leading `error: `.
/// Regex parse errors draw a caret diagram above the actual reason.
pub(crate) fn last_line(message: &str) -> &str {
    let line = message
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    line.strip_prefix("error: ").unwrap_or(line)
}

/// The URL worth opening for `bookmark`, or an error when it is blank.
pub(crate) fn openable_url(bookmark: &Bookmark) -> Result<&str> {
    let url = bookmark.url.trim();
    if url.is_empty() {
        Err(anyhow!("No URL found for the selected bookmark."))
    } else {
        Ok(url)
    }
}
