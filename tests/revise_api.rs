//! HTTP-level tests for the revision queue routes.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{body_json, build_test_app, get, post_json, send};
use consistency_api::db::Store;
use consistency_api::models::revision::RevisionItem;
use serde_json::json;

const LINK_A: &str = "https://codeforces.com/problemset/problem/1850/D";
const LINK_B: &str = "https://codeforces.com/contest/1926/problem/C";

#[tokio::test]
async fn test_enqueue_returns_created_item() {
    let t = build_test_app();
    let response = post_json(&t.router, "/api/revise", json!({ "problem_link": LINK_A })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["problem_link"], LINK_A);
    assert!(body["data"]["id"].is_string());
    assert!(body["data"].get("seq").is_none());
}

#[tokio::test]
async fn test_enqueue_duplicate_conflicts() {
    let t = build_test_app();
    post_json(&t.router, "/api/revise", json!({ "problem_link": LINK_A })).await;
    let response = post_json(&t.router, "/api/revise", json!({ "problem_link": LINK_A })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let list = body_json(get(&t.router, "/api/revise").await).await;
    assert_eq!(list["count"], 1);
}

#[tokio::test]
async fn test_enqueue_rejects_bad_links() {
    let t = build_test_app();
    for link in ["", "https://example.com/problem/1", "codeforces.com/contest/1/problem/A"] {
        let response = post_json(&t.router, "/api/revise", json!({ "problem_link": link })).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{link}");
    }
}

#[tokio::test]
async fn test_empty_queue_peek_and_pop() {
    let t = build_test_app();
    let response = get(&t.router, "/api/revise/peek").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&t.router, Method::DELETE, "/api/revise/pop", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_is_ordered_by_due_date() {
    let t = build_test_app();
    let now = Utc::now();
    t.store
        .insert_revision_item(RevisionItem::new(LINK_B, now))
        .await
        .unwrap();
    t.store
        .insert_revision_item(RevisionItem::new(LINK_A, now - Duration::days(3)))
        .await
        .unwrap();

    let list = body_json(get(&t.router, "/api/revise").await).await;
    assert_eq!(list["count"], 2);
    assert_eq!(list["data"][0]["problem_link"], LINK_A);

    let peek = body_json(get(&t.router, "/api/revise/peek").await).await;
    assert_eq!(peek["problem_link"], LINK_A);
}

#[tokio::test]
async fn test_pop_records_revision_in_today_log() {
    let t = build_test_app();
    let now = Utc::now();
    // Three items due already; two get popped.
    for (i, link) in [LINK_A, LINK_B, "https://codeforces.com/gym/104114/problem/E"]
        .into_iter()
        .enumerate()
    {
        t.store
            .insert_revision_item(RevisionItem::new(link, now - Duration::days(10 + i as i64)))
            .await
            .unwrap();
    }

    for _ in 0..2 {
        let response = send(&t.router, Method::DELETE, "/api/revise/pop", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let today = body_json(get(&t.router, "/api/dashboard/today").await).await;
    let problems = today["revision"]["problems"].as_array().unwrap();
    assert_eq!(problems.len(), 2);
    assert!(problems.iter().all(|p| p["status"] == "SOLVED"));
    assert_eq!(today["revision"]["total_due"], 3);
    assert_eq!(today["revision"]["is_complete"], false);

    // Revision sub-score is 2/3 of 15 = 10, the only credit besides nothing else done.
    let submitted =
        body_json(post_json(&t.router, "/api/dashboard/submit-day", json!({})).await).await;
    assert_eq!(submitted["log"]["consistency_score"], 10);
}

#[tokio::test]
async fn test_pop_after_submit_is_refused() {
    let t = build_test_app();
    post_json(&t.router, "/api/revise", json!({ "problem_link": LINK_A })).await;
    post_json(&t.router, "/api/dashboard/submit-day", json!({})).await;

    let response = send(&t.router, Method::DELETE, "/api/revise/pop", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let list = body_json(get(&t.router, "/api/revise").await).await;
    assert_eq!(list["count"], 1);
}

#[tokio::test]
async fn test_delete_by_id() {
    let t = build_test_app();
    let created = body_json(
        post_json(&t.router, "/api/revise", json!({ "problem_link": LINK_B })).await,
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = send(&t.router, Method::DELETE, &format!("/api/revise/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], true);

    let response = send(&t.router, Method::DELETE, &format!("/api/revise/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
