//! Pipeline stages an idea moves through.
//!
//! The six stages are ordered for display only. Any stage may be set from
//! any other stage (including itself); there is no transition table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A pipeline position. Serialized as its lowercase id (`"new"`, `"poc"`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    New,
    Research,
    Poc,
    Codebase,
    Testing,
    Deployed,
}

impl Stage {
    /// All stages in pipeline display order.
    pub const ALL: [Stage; 6] = [
        Stage::New,
        Stage::Research,
        Stage::Poc,
        Stage::Codebase,
        Stage::Testing,
        Stage::Deployed,
    ];

    /// Stable identifier stored in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::New => "new",
            Stage::Research => "research",
            Stage::Poc => "poc",
            Stage::Codebase => "codebase",
            Stage::Testing => "testing",
            Stage::Deployed => "deployed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid stage '{s}'. Must be one of: {:?}",
                    Stage::ALL.map(Stage::as_str)
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
