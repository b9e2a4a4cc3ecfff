//! Board views over a live idea snapshot.
//!
//! Snapshots arrive in no particular order, so every view sorts on its own
//! criteria. Category references are weak: ids of deleted categories are
//! skipped here rather than assumed absent.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::Category;
use crate::idea::Idea;
use crate::stage::Stage;

/// Newest first; ideas without a creation time sort last.
fn newest_first(a: &Idea, b: &Idea) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Ideas in `stage`, blocked ones first, then newest first.
pub fn pipeline_column(ideas: &[Idea], stage: Stage) -> Vec<Idea> {
    let mut column: Vec<Idea> = ideas.iter().filter(|i| i.stage == stage).cloned().collect();
    column.sort_by(|a, b| b.blocked.cmp(&a.blocked).then_with(|| newest_first(a, b)));
    column
}

/// Ideas tagged with `category_id`, newest first.
pub fn category_column(ideas: &[Idea], category_id: &str) -> Vec<Idea> {
    let mut column: Vec<Idea> = ideas
        .iter()
        .filter(|i| i.categories.iter().any(|c| c == category_id))
        .cloned()
        .collect();
    column.sort_by(newest_first);
    column
}

/// Number of ideas per stage. Every stage is present, even when empty.
pub fn stage_counts(ideas: &[Idea]) -> BTreeMap<Stage, usize> {
    let mut counts: BTreeMap<Stage, usize> = Stage::ALL.into_iter().map(|s| (s, 0)).collect();
    for idea in ideas {
        *counts.entry(idea.stage).or_default() += 1;
    }
    counts
}

/// Summary shown on a category tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub total: usize,
    pub blocked: usize,
    pub by_stage: BTreeMap<Stage, usize>,
}

/// Totals for the ideas tagged with `category_id`.
pub fn category_stats(ideas: &[Idea], category_id: &str) -> CategoryStats {
    let tagged = category_column(ideas, category_id);
    CategoryStats {
        total: tagged.len(),
        blocked: tagged.iter().filter(|i| i.blocked).count(),
        by_stage: stage_counts(&tagged),
    }
}

/// The categories an idea references that still exist, in the idea's order.
pub fn resolve_categories<'a>(idea: &Idea, categories: &'a [Category]) -> Vec<&'a Category> {
    idea.categories
        .iter()
        .filter_map(|id| categories.iter().find(|c| &c.id == id))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
