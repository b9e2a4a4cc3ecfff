//! Change-feed consumer that fires the notification triggers.
//!
//! [`TriggerDispatcher`] runs as a long-lived background task. It receives
//! every committed write from the store's change feed and routes:
//!
//! | collection | change  | trigger                                        |
//! |------------|---------|------------------------------------------------|
//! | `ideas`    | created | [`on_idea_created`](crate::triggers::on_idea_created) |
//! | `ideas`    | updated | [`on_note_added`](crate::triggers::on_note_added)     |
//! | `bugs`     | created | [`on_bug_created`](crate::triggers::on_bug_created)   |
//!
//! Everything else is ignored. A redelivered event produces a second
//! email and nothing worse.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use ideaboard_core::board;
use ideaboard_core::bug_report::BugReport;
use ideaboard_core::idea::Idea;
use ideaboard_store::collections::{BUGS, IDEAS};
use ideaboard_store::repositories::CategoryRepo;
use ideaboard_store::{ChangeEvent, ChangeKind, Document, SharedStore};

use crate::delivery::Notifier;
use crate::triggers::{self, Notification};

/// Field holding a single category label on documents written before ideas
/// carried a list of category ids.
const LEGACY_CATEGORY_FIELD: &str = "category";

/// Background service turning store changes into notification emails.
pub struct TriggerDispatcher {
    store: SharedStore,
    notifier: Notifier,
    board_url: String,
}

impl TriggerDispatcher {
    pub fn new(store: SharedStore, notifier: Notifier, board_url: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            board_url: board_url.into(),
        }
    }

    /// Run the dispatch loop until `cancel` fires or the feed closes.
    ///
    /// Changes are handled one at a time; a lagging receiver logs how many
    /// changes it skipped (those notifications are lost) and continues.
    pub async fn run(self, mut receiver: broadcast::Receiver<ChangeEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Trigger dispatcher cancelled");
                    break;
                }
                result = receiver.recv() => match result {
                    Ok(event) => self.handle(&event).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(
                            skipped = n,
                            "Trigger dispatcher lagged, some notifications were not sent"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Change feed closed, trigger dispatcher shutting down");
                        break;
                    }
                },
            }
        }
    }

    /// Route one change and send whatever it warrants.
    pub async fn handle(&self, event: &ChangeEvent) {
        if let Some(notification) = self.route(event).await {
            self.notifier.notify(&notification).await;
        }
    }

    /// The notification a change warrants, if any.
    pub async fn route(&self, event: &ChangeEvent) -> Option<Notification> {
        match (event.collection.as_str(), event.kind) {
            (IDEAS, ChangeKind::Created) => {
                let doc = event.after.as_ref()?;
                let idea = decode::<Idea>(doc, IDEAS)?;
                let category = self.category_text(doc, &idea).await;
                Some(triggers::on_idea_created(&idea, &category, &self.board_url))
            }
            (IDEAS, ChangeKind::Updated) => {
                let before = decode::<Idea>(event.before.as_ref()?, IDEAS)?;
                let after = decode::<Idea>(event.after.as_ref()?, IDEAS)?;
                triggers::on_note_added(&before, &after, &self.board_url)
            }
            (BUGS, ChangeKind::Created) => {
                let report = decode::<BugReport>(event.after.as_ref()?, BUGS)?;
                Some(triggers::on_bug_created(&report, &self.board_url))
            }
            _ => None,
        }
    }

    /// Labels of the idea's categories that still exist, else the legacy
    /// single `category` field, else "Uncategorized".
    async fn category_text(&self, doc: &Document, idea: &Idea) -> String {
        let mut labels = Vec::new();
        if !idea.categories.is_empty() {
            match CategoryRepo::list(self.store.as_ref()).await {
                Ok(categories) => labels.extend(
                    board::resolve_categories(idea, &categories)
                        .into_iter()
                        .map(|c| c.label.clone()),
                ),
                Err(e) => {
                    tracing::warn!(error = %e, idea_id = %idea.id, "Failed to resolve categories");
                }
            }
        }

        if labels.is_empty() {
            if let Some(legacy) = doc
                .field(LEGACY_CATEGORY_FIELD)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
            {
                labels.push(legacy.to_string());
            }
        }

        triggers::category_line(&labels)
    }
}

fn decode<T: serde::de::DeserializeOwned>(doc: &Document, collection: &str) -> Option<T> {
    match doc.decode(collection) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping trigger for undecodable document");
            None
        }
    }
}
