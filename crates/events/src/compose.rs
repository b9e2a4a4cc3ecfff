//! HTML building blocks for notification emails.
//!
//! Every piece of user-supplied text goes through [`escape_html`] before it
//! is interpolated; the shared [`frame`] wraps a message body with its
//! heading and the link back to the board.

use chrono::{DateTime, Utc};

/// Shown when a timestamp is missing or unparseable.
pub const UNKNOWN_TIME: &str = "Unknown";

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Human-readable UTC time, e.g. `2024-03-01 14:05 UTC`.
pub fn format_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

/// Like [`format_time`] for an RFC 3339 string; unparseable input is shown
/// escaped as-is.
pub fn format_rfc3339(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => format_time(Some(at.with_timezone(&Utc))),
        Err(_) if raw.is_empty() => UNKNOWN_TIME.to_string(),
        Err(_) => escape_html(raw),
    }
}

/// Colour scheme of one message kind.
#[derive(Debug, Clone, Copy)]
pub struct Accent {
    pub color: &'static str,
    pub panel: &'static str,
}

pub const IDEA_ACCENT: Accent = Accent {
    color: "#3b82f6",
    panel: "#f1f5f9",
};

pub const NOTE_ACCENT: Accent = Accent {
    color: "#8b5cf6",
    panel: "#f1f5f9",
};

pub const BUG_ACCENT: Accent = Accent {
    color: "#ef4444",
    panel: "#fef2f2",
};

/// A highlighted panel around already-escaped HTML.
pub fn panel(accent: Accent, inner: &str) -> String {
    format!(
        r#"<div style="background: {}; padding: 20px; border-radius: 8px; margin: 16px 0; border-left: 4px solid {};">{inner}</div>"#,
        accent.panel, accent.color
    )
}

/// Wrap an already-escaped body with a heading and a button linking to
/// `board_url`.
pub fn frame(accent: Accent, heading: &str, body: &str, link_label: &str, board_url: &str) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;"><h2 style="color: {color};">{heading}</h2>{body}<a href="{url}" style="display: inline-block; background: {color}; color: white; padding: 12px 24px; border-radius: 8px; text-decoration: none; margin-top: 16px;">{link}</a></div>"#,
        color = accent.color,
        heading = escape_html(heading),
        url = escape_html(board_url),
        link = escape_html(link_label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn formats_times() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap();
        assert_eq!(format_time(Some(at)), "2024-03-01 14:05 UTC");
        assert_eq!(format_time(None), UNKNOWN_TIME);
        assert_eq!(format_rfc3339("2024-03-01T14:05:09.123Z"), "2024-03-01 14:05 UTC");
        assert_eq!(format_rfc3339(""), UNKNOWN_TIME);
        assert_eq!(format_rfc3339("<soon>"), "&lt;soon&gt;");
    }

    #[test]
    fn frame_links_to_board() {
        let html = frame(BUG_ACCENT, "New Bug Report", "<p>x</p>", "View", "https://board.test/?a=1&b=2");
        assert!(html.contains(r#"href="https://board.test/?a=1&amp;b=2""#));
        assert!(html.contains("<p>x</p>"));
        assert!(html.contains("#ef4444"));
    }
}
