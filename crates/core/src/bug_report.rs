//! Bug reports submitted from the board.
//!
//! Reports only ever get created; their sole consumer is the bug
//! notification trigger.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DocId, Timestamp};

/// Maximum length for the user-provided description field (characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// Characters of the description shown in a notification subject.
pub const SUBJECT_PREVIEW_CHARS: usize = 50;

/// Characters of the user agent kept in a notification body.
pub const USER_AGENT_PREVIEW_CHARS: usize = 100;

/// A document from the `bugs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReport {
    pub id: DocId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Input for submitting a bug report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBugReport {
    pub description: String,
    pub contact: Option<String>,
    pub user_agent: Option<String>,
}

/// Validate the description: present and bounded.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation("description must not be empty".into()));
    }
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Longest prefix of `s` holding at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_within_limit_is_valid() {
        assert!(validate_description("Button does nothing").is_ok());
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_LENGTH)).is_ok());
    }

    #[test]
    fn description_over_limit_is_rejected() {
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
    }

    #[test]
    fn blank_description_is_rejected() {
        assert!(validate_description("   ").is_err());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 50), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn user_agent_field_is_camel_case() {
        let input: NewBugReport =
            serde_json::from_str(r#"{"description":"d","userAgent":"Mozilla/5.0"}"#).unwrap();
        assert_eq!(input.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert!(input.contact.is_none());
    }
}
