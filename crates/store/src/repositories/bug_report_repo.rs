//! Repository for the `bugs` collection.

use ideaboard_core::bug_report::{BugReport, NewBugReport};
use ideaboard_core::types::DocId;

use crate::document::{collections::BUGS, Patch};
use crate::error::{StoreReadError, StoreWriteError};
use crate::store::DocumentStore;

/// Provides creation and listing of bug reports.
pub struct BugReportRepo;

impl BugReportRepo {
    /// Store a new report with a server `createdAt`.
    pub async fn create(
        store: &dyn DocumentStore,
        input: &NewBugReport,
    ) -> Result<DocId, StoreWriteError> {
        let mut patch = Patch::new().set("description", input.description.as_str());
        if let Some(contact) = &input.contact {
            patch = patch.set("contact", contact.as_str());
        }
        if let Some(user_agent) = &input.user_agent {
            patch = patch.set("userAgent", user_agent.as_str());
        }

        let id = store
            .insert(BUGS, patch.server_timestamp("createdAt"))
            .await?;
        tracing::info!(bug_report_id = %id, "Bug report submitted");
        Ok(id)
    }

    /// All reports, newest first.
    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<BugReport>, StoreReadError> {
        let mut reports = store
            .list(BUGS)
            .await?
            .iter()
            .map(|doc| doc.decode::<BugReport>(BUGS))
            .collect::<Result<Vec<_>, _>>()?;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }
}
