//! Filename generation from the configured template.

use chrono::{DateTime, Datelike, TimeZone, Timelike};

/// Title used when the note has no usable first line.
pub const UNTITLED: &str = "untitled";

/// Maximum title length in characters.
const MAX_TITLE_CHARS: usize = 50;

/// Characters that are invalid in filenames on at least one platform.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\\', '/'];

/// Expand `template` for a note with `content` written at `now`.
///
/// Placeholders: `{yyyy}` `{MM}` `{dd}` `{HH}` `{mm}` `{ss}` `{title}`, plus
/// `{HHmm}` as shorthand for hour and minute. The result always ends in `.md`.
pub fn generate_filename<Tz: TimeZone>(content: &str, template: &str, now: &DateTime<Tz>) -> String {
    let title = extract_title(content)
        .map(|title| sanitize_filename(&title))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let mut filename = template
        .replace("{HHmm}", &format!("{:02}{:02}", now.hour(), now.minute()))
        .replace("{yyyy}", &now.year().to_string())
        .replace("{MM}", &format!("{:02}", now.month()))
        .replace("{dd}", &format!("{:02}", now.day()))
        .replace("{HH}", &format!("{:02}", now.hour()))
        .replace("{mm}", &format!("{:02}", now.minute()))
        .replace("{ss}", &format!("{:02}", now.second()))
        .replace("{title}", &title);

    if !filename.ends_with(".md") {
        filename.push_str(".md");
    }

    filename
}

/// First non-blank line with any leading `#` heading marks removed.
pub fn extract_title(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.trim_start_matches('#').trim_start())
        .find(|title| !title.is_empty())
        .map(str::to_string)
}

/// Strip invalid characters, collapse whitespace and cap the length.
pub fn sanitize_filename(title: &str) -> String {
    let stripped: String = title.chars().filter(|c| !INVALID_CHARS.contains(c)).collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_TITLE_CHARS).collect()
}
