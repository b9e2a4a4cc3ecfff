//! Category labels and the defaults seeded into an empty board.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DocId;

/// Colour used when a new category does not specify one.
pub const DEFAULT_COLOR: &str = "#6366F1";

/// A document from the `categories` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: DocId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: String,
}

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub label: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// A category written with a fixed document id during seeding.
#[derive(Debug, Clone, Copy)]
pub struct DefaultCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

/// The five categories seeded when the collection is empty.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 5] = [
    DefaultCategory {
        id: "projects",
        label: "🚀 SIDE PROJECTS",
        color: "#00D9FF",
    },
    DefaultCategory {
        id: "revenue",
        label: "💰 REVENUE STREAMS",
        color: "#00FF9F",
    },
    DefaultCategory {
        id: "skills",
        label: "🧠 SKILLS & LEARNING",
        color: "#8B5CF6",
    },
    DefaultCategory {
        id: "tools",
        label: "🔧 TOOLS & AUTOMATION",
        color: "#FF6B35",
    },
    DefaultCategory {
        id: "opensource",
        label: "🌐 OPEN SOURCE",
        color: "#FFD700",
    },
];

/// Accepts `#RGB` or `#RRGGBB`.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// A category needs a non-blank label and a hex colour.
pub fn validate_new_category(input: &NewCategory) -> Result<(), CoreError> {
    if input.label.trim().is_empty() {
        return Err(CoreError::Validation("label must not be empty".into()));
    }
    if !is_hex_color(&input.color) {
        return Err(CoreError::Validation(format!(
            "color must be a hex value like #6366F1 (got '{}')",
            input.color
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
