//! The three notification triggers.
//!
//! Each trigger is a pure function from the documents a write produced to
//! the message it warrants. Sending, and swallowing send failures, is the
//! [`Notifier`](crate::Notifier)'s business; deciding which write reaches
//! which trigger is the [`TriggerDispatcher`](crate::TriggerDispatcher)'s.

use ideaboard_core::bug_report::{
    truncate_chars, BugReport, SUBJECT_PREVIEW_CHARS, USER_AGENT_PREVIEW_CHARS,
};
use ideaboard_core::idea::Idea;

use crate::compose::{
    escape_html, format_rfc3339, format_time, frame, panel, BUG_ACCENT, IDEA_ACCENT, NOTE_ACCENT,
};

/// Body text for an idea submitted without a description.
pub const NO_DESCRIPTION: &str = "No description provided";

/// Category line for an idea with no resolvable category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Shown for a bug report without a user agent.
pub const UNKNOWN_USER_AGENT: &str = "Unknown";

const PIPELINE_LINK: &str = "View Ideas Pipeline";
const BUGS_LINK: &str = "View Bug Reports";

/// One outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html: String,
}

/// Join resolved category labels for display.
pub fn category_line(labels: &[String]) -> String {
    if labels.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        labels.join(", ")
    }
}

/// A new idea was submitted.
///
/// `category` is the already-resolved label text (see [`category_line`]).
pub fn on_idea_created(idea: &Idea, category: &str, board_url: &str) -> Notification {
    let description = if idea.description.trim().is_empty() {
        NO_DESCRIPTION
    } else {
        idea.description.as_str()
    };

    let body = format!(
        "{}<p style=\"color: #64748b; font-size: 14px;\">Category: {}<br>Submitted by: {}<br>Submitted: {}</p>",
        panel(
            IDEA_ACCENT,
            &format!(
                "<h3 style=\"margin: 0 0 8px 0; color: #1e293b;\">{}</h3><p style=\"margin: 0; color: #475569;\">{}</p>",
                escape_html(&idea.title),
                escape_html(description),
            ),
        ),
        escape_html(category),
        escape_html(&idea.submitter),
        format_time(idea.created_at),
    );

    Notification {
        subject: format!("New Idea: {}", idea.title),
        html: frame(IDEA_ACCENT, "New Idea Submitted", &body, PIPELINE_LINK, board_url),
    }
}

/// An idea was updated; notify only when its notes array grew.
///
/// The new note is taken to be the last element after the write. This is
/// a length comparison, not a diff: an update that adds one note and
/// removes another, or only reorders notes, is not reported.
pub fn on_note_added(before: &Idea, after: &Idea, board_url: &str) -> Option<Notification> {
    if after.notes.len() <= before.notes.len() {
        return None;
    }
    let note = after.notes.last()?;

    let body = format!(
        "<p style=\"color: #64748b;\">A note was added to the idea \"<strong>{}</strong>\"</p>{}",
        escape_html(&after.title),
        panel(
            NOTE_ACCENT,
            &format!(
                "<p style=\"margin: 0; color: #1e293b;\">{}</p><p style=\"margin: 8px 0 0 0; color: #64748b; font-size: 12px;\">{} &middot; {}</p>",
                escape_html(&note.text),
                escape_html(&note.author),
                format_rfc3339(&note.date),
            ),
        ),
    );

    Some(Notification {
        subject: format!("New Note on: {}", after.title),
        html: frame(NOTE_ACCENT, "New Note Added", &body, PIPELINE_LINK, board_url),
    })
}

/// A bug report was submitted.
pub fn on_bug_created(report: &BugReport, board_url: &str) -> Notification {
    let contact = match report.contact.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(contact) => format!("Contact: {}<br>", escape_html(contact)),
        None => String::new(),
    };
    let user_agent = match report.user_agent.as_deref().filter(|ua| !ua.is_empty()) {
        Some(ua) => escape_html(truncate_chars(ua, USER_AGENT_PREVIEW_CHARS)),
        None => UNKNOWN_USER_AGENT.to_string(),
    };

    let body = format!(
        "{}<p style=\"color: #64748b; font-size: 14px;\">{contact}Submitted: {}<br>User Agent: <code style=\"font-size: 11px;\">{user_agent}</code></p>",
        panel(
            BUG_ACCENT,
            &format!(
                "<p style=\"margin: 0; color: #1e293b;\">{}</p>",
                escape_html(&report.description)
            ),
        ),
        format_time(report.created_at),
    );

    Notification {
        subject: format!(
            "Bug Report: {}...",
            truncate_chars(&report.description, SUBJECT_PREVIEW_CHARS)
        ),
        html: frame(BUG_ACCENT, "New Bug Report", &body, BUGS_LINK, board_url),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ideaboard_core::idea::Note;
    use ideaboard_core::stage::Stage;

    const BOARD: &str = "https://board.test/";

    fn idea(title: &str, notes: Vec<Note>) -> Idea {
        Idea {
            id: "i1".into(),
            title: title.into(),
            description: String::new(),
            submitter: "alice".into(),
            stage: Stage::New,
            categories: vec![],
            blocked: false,
            blocked_reason: String::new(),
            notes,
            created_at: None,
            updated_at: None,
        }
    }

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.into(),
            text: text.into(),
            author: "bob".into(),
            date: "2024-03-01T14:05:09.000Z".into(),
        }
    }

    fn report(description: &str) -> BugReport {
        BugReport {
            id: "b1".into(),
            description: description.into(),
            contact: None,
            user_agent: None,
            created_at: None,
        }
    }

    #[test]
    fn idea_message_falls_back_for_missing_description() {
        let n = on_idea_created(&idea("Ship it", vec![]), UNCATEGORIZED, BOARD);
        assert_eq!(n.subject, "New Idea: Ship it");
        assert!(n.html.contains(NO_DESCRIPTION));
        assert!(n.html.contains("Category: Uncategorized"));
        assert!(n.html.contains(BOARD));
    }

    #[test]
    fn idea_message_escapes_user_text() {
        let mut i = idea("<b>bold</b>", vec![]);
        i.description = "a & b".into();
        let n = on_idea_created(&i, "Tools & Co", BOARD);
        assert!(n.html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(n.html.contains("a &amp; b"));
        assert!(n.html.contains("Tools &amp; Co"));
        assert!(!n.html.contains("<b>bold</b>"));
    }

    #[test]
    fn category_line_joins_or_falls_back() {
        assert_eq!(category_line(&[]), UNCATEGORIZED);
        assert_eq!(
            category_line(&["Tools".to_string(), "Skills".to_string()]),
            "Tools, Skills"
        );
    }

    #[test]
    fn note_added_uses_last_note() {
        let before = idea("Widget", vec![note("n1", "first")]);
        let after = idea("Widget", vec![note("n1", "first"), note("n2", "second")]);

        let n = on_note_added(&before, &after, BOARD).unwrap();
        assert_eq!(n.subject, "New Note on: Widget");
        assert!(n.html.contains("second"));
        assert!(n.html.contains("bob"));
        assert!(n.html.contains("2024-03-01 14:05 UTC"));
    }

    #[test]
    fn add_and_remove_in_one_write_is_not_reported() {
        let before = idea("Widget", vec![note("n1", "a"), note("n2", "b")]);
        let after = idea("Widget", vec![note("n1", "a"), note("n3", "c")]);
        assert!(on_note_added(&before, &after, BOARD).is_none());
    }

    #[test]
    fn reorder_is_not_reported() {
        let before = idea("Widget", vec![note("n1", "a"), note("n2", "b")]);
        let after = idea("Widget", vec![note("n2", "b"), note("n1", "a")]);
        assert!(on_note_added(&before, &after, BOARD).is_none());
    }

    #[test]
    fn note_removal_and_other_edits_are_not_reported() {
        let before = idea("Widget", vec![note("n1", "a")]);
        assert!(on_note_added(&before, &idea("Widget", vec![]), BOARD).is_none());
        assert!(on_note_added(&before, &idea("Renamed", vec![note("n1", "a")]), BOARD).is_none());
    }

    #[test]
    fn bug_subject_truncates_description() {
        let long = "x".repeat(80);
        let n = on_bug_created(&report(&long), BOARD);
        assert_eq!(n.subject, format!("Bug Report: {}...", "x".repeat(50)));

        let short = on_bug_created(&report("Crash"), BOARD);
        assert_eq!(short.subject, "Bug Report: Crash...");
    }

    #[test]
    fn bug_body_handles_optional_fields() {
        let bare = on_bug_created(&report("Crash"), BOARD);
        assert!(!bare.html.contains("Contact:"));
        assert!(bare.html.contains(UNKNOWN_USER_AGENT));

        let mut full = report("Crash");
        full.contact = Some("dana@example.com".into());
        full.user_agent = Some("U".repeat(150));
        let n = on_bug_created(&full, BOARD);
        assert!(n.html.contains("Contact: dana@example.com"));
        assert!(n.html.contains(&"U".repeat(100)));
        assert!(!n.html.contains(&"U".repeat(101)));
    }
}
