//! Integration tests for category seeding and the bug report collection.

use std::sync::Arc;

use assert_matches::assert_matches;
use futures::StreamExt;
use ideaboard_core::bug_report::NewBugReport;
use ideaboard_core::category::{NewCategory, DEFAULT_CATEGORIES, DEFAULT_COLOR};
use ideaboard_store::repositories::{BugReportRepo, CategoryRepo};
use ideaboard_store::{collections, DocumentStore, MemoryStore, Patch, StoreWriteError};

// ---------------------------------------------------------------------------
// Test: seeding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeding_an_empty_store_writes_the_defaults() {
    let store = MemoryStore::new();

    let created = CategoryRepo::ensure_seeded(&store).await.unwrap();
    assert_eq!(created, DEFAULT_CATEGORIES.len());

    let mut ids: Vec<_> = CategoryRepo::list(&store)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    ids.sort();
    assert_eq!(ids, ["opensource", "projects", "revenue", "skills", "tools"]);
}

#[tokio::test]
async fn seeding_twice_leaves_five_categories() {
    let store = MemoryStore::new();

    CategoryRepo::ensure_seeded(&store).await.unwrap();
    let second = CategoryRepo::ensure_seeded(&store).await.unwrap();

    assert_eq!(second, 0);
    assert_eq!(CategoryRepo::list(&store).await.unwrap().len(), 5);
}

#[tokio::test]
async fn concurrent_seeders_converge_on_five() {
    let store = Arc::new(MemoryStore::new());

    let (a, b) = tokio::join!(
        CategoryRepo::ensure_seeded(store.as_ref()),
        CategoryRepo::ensure_seeded(store.as_ref()),
    );

    assert_eq!(a.unwrap() + b.unwrap(), 5);
    assert_eq!(CategoryRepo::list(store.as_ref()).await.unwrap().len(), 5);
}

#[tokio::test]
async fn any_existing_category_suppresses_seeding() {
    let store = MemoryStore::new();
    CategoryRepo::create(
        &store,
        &NewCategory {
            label: "Mine".into(),
            color: DEFAULT_COLOR.into(),
        },
    )
    .await
    .unwrap();

    assert_eq!(CategoryRepo::ensure_seeded(&store).await.unwrap(), 0);

    let categories = CategoryRepo::list(&store).await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].label, "Mine");
    assert_eq!(categories[0].color, "#6366F1");
}

#[tokio::test]
async fn subscribe_seeds_then_streams() {
    let store = MemoryStore::new();

    let mut sub = CategoryRepo::subscribe(&store).await.unwrap();
    let first = sub.next().await.unwrap().unwrap();
    assert_eq!(first.len(), 5);

    CategoryRepo::delete(&store, "tools").await.unwrap();
    let second = sub.next().await.unwrap().unwrap();
    assert_eq!(second.len(), 4);
    assert!(second.iter().all(|c| c.id != "tools"));
}

#[tokio::test]
async fn subscribe_survives_a_failed_seed() {
    let store = MemoryStore::new();
    store.reject_writes(Some("read only".into())).await;

    let mut sub = CategoryRepo::subscribe(&store).await.unwrap();
    assert!(sub.next().await.unwrap().unwrap().is_empty());
}

#[tokio::test]
async fn undecodable_categories_are_skipped() {
    let store = MemoryStore::new();
    store
        .insert_with_id(collections::CATEGORIES, "broken", Patch::new().set("label", 42))
        .await
        .unwrap();
    store
        .insert_with_id(
            collections::CATEGORIES,
            "fine",
            Patch::new().set("label", "Fine").set("color", "#000000"),
        )
        .await
        .unwrap();

    let mut sub = CategoryRepo::subscribe(&store).await.unwrap();
    let snapshot = sub.next().await.unwrap().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, "fine");
}

// ---------------------------------------------------------------------------
// Test: bug reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bug_reports_keep_optional_fields_and_sort_newest_first() {
    let store = MemoryStore::new();

    let first = BugReportRepo::create(
        &store,
        &NewBugReport {
            description: "Button does nothing".into(),
            contact: None,
            user_agent: Some("Mozilla/5.0".into()),
        },
    )
    .await
    .unwrap();
    let second = BugReportRepo::create(
        &store,
        &NewBugReport {
            description: "Page is blank".into(),
            contact: Some("dana@example.com".into()),
            user_agent: None,
        },
    )
    .await
    .unwrap();

    let reports = BugReportRepo::list(&store).await.unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].id, second);
    assert_eq!(reports[0].contact.as_deref(), Some("dana@example.com"));
    assert_eq!(reports[1].id, first);
    assert_eq!(reports[1].user_agent.as_deref(), Some("Mozilla/5.0"));
    assert!(reports[1].contact.is_none());
    assert!(reports[0].created_at >= reports[1].created_at);
}

#[tokio::test]
async fn bug_report_write_failure_is_returned() {
    let store = MemoryStore::new();
    store.reject_writes(Some("quota".into())).await;

    let err = BugReportRepo::create(
        &store,
        &NewBugReport {
            description: "x".into(),
            contact: None,
            user_agent: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, StoreWriteError::Rejected(_));
}
