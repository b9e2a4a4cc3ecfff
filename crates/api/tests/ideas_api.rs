//! Integration tests for the idea endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_idea, delete, get, patch_json, post_json, put_empty, put_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: create then read back
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_returns_initial_state() {
    let test = common::build_test_app().await;
    let id = create_idea(&test.app, "Ship the widget").await;

    let response = get(&test.app, &format!("/api/v1/ideas/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let idea = &body_json(response).await["data"];
    assert_eq!(idea["id"], id.as_str());
    assert_eq!(idea["title"], "Ship the widget");
    assert_eq!(idea["stage"], "new");
    assert_eq!(idea["blocked"], false);
    assert_eq!(idea["blockedReason"], "");
    assert_eq!(idea["notes"], json!([]));
    assert!(idea["createdAt"].is_string());
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let test = common::build_test_app().await;

    let response = post_json(
        &test.app,
        "/api/v1/ideas",
        json!({ "title": "  ", "submitter": "alice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_idea_is_404() {
    let test = common::build_test_app().await;

    let response = get(&test.app, "/api/v1/ideas/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(&test.app, "/api/v1/ideas/nope/stage", json!({ "stage": "poc" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        &test.app,
        "/api/v1/ideas/nope/notes",
        json!({ "text": "hi", "author": "bob" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: stage moves and blocking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn move_stage_accepts_any_stage_and_rejects_unknown() {
    let test = common::build_test_app().await;
    let id = create_idea(&test.app, "Roam").await;

    for stage in ["deployed", "new", "testing", "research"] {
        let response = put_json(
            &test.app,
            &format!("/api/v1/ideas/{id}/stage"),
            json!({ "stage": stage }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let idea = body_json(get(&test.app, &format!("/api/v1/ideas/{id}")).await).await;
    assert_eq!(idea["data"]["stage"], "research");

    let response = put_json(
        &test.app,
        &format!("/api/v1/ideas/{id}/stage"),
        json!({ "stage": "shipped" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn block_and_unblock() {
    let test = common::build_test_app().await;
    let id = create_idea(&test.app, "Ship the widget").await;
    let uri = format!("/api/v1/ideas/{id}/blocked");

    let response = put_json(&test.app, &uri, json!({ "blocked": true, "reason": "waiting on design" })).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let idea = body_json(get(&test.app, &format!("/api/v1/ideas/{id}")).await).await;
    assert_eq!(idea["data"]["blocked"], true);
    assert_eq!(idea["data"]["blockedReason"], "waiting on design");

    put_json(&test.app, &uri, json!({ "blocked": false })).await;
    let idea = body_json(get(&test.app, &format!("/api/v1/ideas/{id}")).await).await;
    assert_eq!(idea["data"]["blocked"], false);
    assert_eq!(idea["data"]["blockedReason"], "");
}

// ---------------------------------------------------------------------------
// Test: listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stage_column_puts_blocked_first_then_newest() {
    let test = common::build_test_app().await;
    let old_blocked = create_idea(&test.app, "old blocked").await;
    let older = create_idea(&test.app, "older").await;
    let newer = create_idea(&test.app, "newer").await;
    let elsewhere = create_idea(&test.app, "elsewhere").await;

    put_json(
        &test.app,
        &format!("/api/v1/ideas/{old_blocked}/blocked"),
        json!({ "blocked": true, "reason": "x" }),
    )
    .await;
    put_json(
        &test.app,
        &format!("/api/v1/ideas/{elsewhere}/stage"),
        json!({ "stage": "poc" }),
    )
    .await;

    let json = body_json(get(&test.app, "/api/v1/ideas?stage=new").await).await;
    let ids: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, [old_blocked, newer, older]);
}

#[tokio::test]
async fn category_filter_and_invalid_stage() {
    let test = common::build_test_app().await;
    let tagged = create_idea(&test.app, "tagged").await;
    create_idea(&test.app, "untagged").await;

    let response = put_empty(&test.app, &format!("/api/v1/ideas/{tagged}/categories/tools")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(&test.app, "/api/v1/ideas?category=tools").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], tagged.as_str());

    let all = body_json(get(&test.app, "/api/v1/ideas").await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let response = get(&test.app, "/api/v1/ideas?stage=bogus").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: edits, notes, categories, delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn patch_updates_details_and_rejects_empty_patch() {
    let test = common::build_test_app().await;
    let id = create_idea(&test.app, "Draft").await;
    let uri = format!("/api/v1/ideas/{id}");

    let response = patch_json(&test.app, &uri, json!({ "description": "More words" })).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let idea = body_json(get(&test.app, &uri).await).await;
    assert_eq!(idea["data"]["title"], "Draft");
    assert_eq!(idea["data"]["description"], "More words");

    let response = patch_json(&test.app, &uri, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notes_round_trip() {
    let test = common::build_test_app().await;
    let id = create_idea(&test.app, "Noted").await;

    let response = post_json(
        &test.app,
        &format!("/api/v1/ideas/{id}/notes"),
        json!({ "text": "Looks good", "author": "bob" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let note = body_json(response).await["data"].clone();
    assert_eq!(note["text"], "Looks good");
    let note_id = note["id"].as_str().unwrap();

    let idea = body_json(get(&test.app, &format!("/api/v1/ideas/{id}")).await).await;
    assert_eq!(idea["data"]["notes"].as_array().unwrap().len(), 1);

    let response = delete(&test.app, &format!("/api/v1/ideas/{id}/notes/{note_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let idea = body_json(get(&test.app, &format!("/api/v1/ideas/{id}")).await).await;
    assert_eq!(idea["data"]["notes"], json!([]));
}

#[tokio::test]
async fn note_requires_text_and_author() {
    let test = common::build_test_app().await;
    let id = create_idea(&test.app, "Noted").await;

    let response = post_json(
        &test.app,
        &format!("/api/v1/ideas/{id}/notes"),
        json!({ "text": "", "author": "bob" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tag_and_untag() {
    let test = common::build_test_app().await;
    let id = create_idea(&test.app, "Tagged").await;
    let uri = format!("/api/v1/ideas/{id}/categories/skills");

    put_empty(&test.app, &uri).await;
    put_empty(&test.app, &uri).await;
    let idea = body_json(get(&test.app, &format!("/api/v1/ideas/{id}")).await).await;
    assert_eq!(idea["data"]["categories"], json!(["skills"]));

    let response = delete(&test.app, &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let idea = body_json(get(&test.app, &format!("/api/v1/ideas/{id}")).await).await;
    assert_eq!(idea["data"]["categories"], json!([]));
}

#[tokio::test]
async fn delete_is_repeatable() {
    let test = common::build_test_app().await;
    let id = create_idea(&test.app, "Doomed").await;
    let uri = format!("/api/v1/ideas/{id}");

    assert_eq!(delete(&test.app, &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(&test.app, &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete(&test.app, &uri).await.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Test: store failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rejected_writes_return_502() {
    let test = common::build_test_app().await;
    test.store.reject_writes(Some("permission denied".into())).await;

    let response = post_json(
        &test.app,
        "/api/v1/ideas",
        json!({ "title": "Nope", "submitter": "alice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "STORE_REJECTED");
}

#[tokio::test]
async fn failed_live_query_returns_503() {
    let test = common::build_test_app().await;
    test.store.fail_live_queries("ideas", "connection lost").await;

    let response = get(&test.app, "/api/v1/ideas").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
