//! HTTP-level tests for the dashboard routes, backed by the in-memory store.

mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use common::{
    body_json, build_test_app, build_test_app_with, get, post_json, send, test_config, StubJudge,
};
use consistency_api::db::Store;
use consistency_api::models::user_config::UserConfig;
use serde_json::json;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_and_readiness() {
    let t = build_test_app();
    let response = get(&t.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");

    let response = get(&t.router, "/readyz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["checks"]["store"], "ok");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let t = build_test_app();
    let response = get(&t.router, "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Today
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_today_creates_log_lazily() {
    let t = build_test_app();
    let response = get(&t.router, "/api/dashboard/today").await;
    assert_eq!(response.status(), StatusCode::OK);

    let log = body_json(response).await;
    assert_eq!(log["date"], Utc::now().date_naive().to_string());
    assert_eq!(log["is_submitted"], false);
    assert_eq!(log["consistency_score"], 0);
    assert_eq!(log["codeforces"]["target_problems"].as_array().unwrap().len(), 6);
    assert_eq!(log["codeforces"]["target_problems"][0]["status"], "PENDING");
    assert_eq!(log["workout"]["checklist"].as_object().unwrap().len(), 6);

    // A second read reuses the same log.
    let again = body_json(get(&t.router, "/api/dashboard/today").await).await;
    assert_eq!(again["id"], log["id"]);
}

#[tokio::test]
async fn test_toggle_prayer_recounts() {
    let t = build_test_app();
    let response = post_json(
        &t.router,
        "/api/dashboard/toggle-prayer",
        json!({ "prayer": "fajr" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let log = body_json(response).await;
    assert_eq!(log["prayers"]["fajr"], true);
    assert_eq!(log["prayers"]["count"], 1);

    let log = body_json(
        post_json(
            &t.router,
            "/api/dashboard/toggle-prayer",
            json!({ "prayer": "fajr" }),
        )
        .await,
    )
    .await;
    assert_eq!(log["prayers"]["fajr"], false);
    assert_eq!(log["prayers"]["count"], 0);
}

#[tokio::test]
async fn test_toggle_unknown_prayer_is_rejected() {
    let t = build_test_app();
    let response = post_json(
        &t.router,
        "/api/dashboard/toggle-prayer",
        json!({ "prayer": "tahajjud" }),
    )
    .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_update_derives_counters() {
    let t = build_test_app();
    let response = send(
        &t.router,
        Method::PATCH,
        "/api/dashboard/update",
        Some(json!({
            "prayers": { "fajr": true, "isha": true },
            "workout": { "checklist": {
                "pushups": true, "situps": true, "squats": true,
                "biceps": true, "deadlift": true, "running": true
            }},
            "academic": { "done": 1.5 },
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let log = body_json(response).await;
    assert_eq!(log["prayers"]["count"], 2);
    assert_eq!(log["workout"]["is_completed"], true);
    assert_eq!(log["academic"]["hours_done"], 1.5);
    assert_eq!(log["consistency_score"], 0);
}

#[tokio::test]
async fn test_update_rejects_negative_progress() {
    let t = build_test_app();
    let response = send(
        &t.router,
        Method::PATCH,
        "/api/dashboard/update",
        Some(json!({ "kaggle": { "done": -5.0 } })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_refresh_status_marks_solved_targets() {
    let t = build_test_app();
    get(&t.router, "/api/dashboard/today").await;
    t.judge.accept("1990C");

    let response = post_json(&t.router, "/api/dashboard/refresh-status", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let log = body_json(response).await;
    assert_eq!(log["codeforces"]["solved_count"], 1);
    assert_eq!(log["codeforces"]["target_problems"][0]["status"], "SOLVED");
    assert_eq!(log["codeforces"]["is_complete"], false);
}

#[tokio::test]
async fn test_judge_calls_use_stored_handle() {
    let t = build_test_app();
    let config = UserConfig::new("stored_handle", Utc::now().date_naive());
    t.store.save_user_config(&config).await.unwrap();

    get(&t.router, "/api/dashboard/today").await;
    post_json(&t.router, "/api/dashboard/refresh-status", json!({})).await;

    let seen = t.judge.handles_seen.lock().unwrap().clone();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|h| h == "stored_handle"), "{seen:?}");
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_submit_scores_and_locks_the_day() {
    let t = build_test_app();
    send(
        &t.router,
        Method::PATCH,
        "/api/dashboard/update",
        Some(json!({
            "prayers": { "fajr": true, "dhuhr": true, "asr": true, "maghrib": true, "isha": true },
            "leetcode_status": "SOLVED",
            "workout": { "checklist": {
                "pushups": true, "situps": true, "squats": true,
                "biceps": true, "deadlift": true, "running": true
            }},
            "academic": { "done": 3.0 },
            "kaggle": { "done": 60.0 },
        })),
    )
    .await;

    let response = post_json(
        &t.router,
        "/api/dashboard/submit-day",
        json!({ "comment": "solid day" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // Everything but the six Codeforces targets: 100 - 30.
    assert_eq!(body["log"]["consistency_score"], 70);
    assert_eq!(body["log"]["is_submitted"], true);
    assert_eq!(body["log"]["comment"], "solid day");
    assert!(body["new_badges"].as_array().unwrap().is_empty());

    // Further mutation is refused and leaves the score alone.
    let response = post_json(
        &t.router,
        "/api/dashboard/toggle-prayer",
        json!({ "prayer": "fajr" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err = body_json(response).await;
    assert_eq!(err["error"]["message"], "Day already submitted. Cannot modify.");

    let response = post_json(&t.router, "/api/dashboard/submit-day", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let today = body_json(get(&t.router, "/api/dashboard/today").await).await;
    assert_eq!(today["consistency_score"], 70);
    assert_eq!(today["prayers"]["fajr"], true);
}

#[tokio::test]
async fn test_submit_with_empty_queue_gives_revision_credit() {
    let t = build_test_app();
    let body = body_json(post_json(&t.router, "/api/dashboard/submit-day", json!({})).await).await;
    assert_eq!(body["log"]["consistency_score"], 15);
    assert_eq!(body["log"]["revision"]["total_due"], 0);
}

// ---------------------------------------------------------------------------
// Tomorrow tasks, history, extras
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_tomorrow_tasks_round_trip() {
    let t = build_test_app();
    let response = post_json(
        &t.router,
        "/api/dashboard/tomorrow-task",
        json!({ "type": "academic", "task": "linear algebra ch. 2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    post_json(
        &t.router,
        "/api/dashboard/tomorrow-task",
        json!({ "type": "kaggle", "task": "feature engineering" }),
    )
    .await;

    let tasks = body_json(get(&t.router, "/api/dashboard/tomorrow-tasks").await).await;
    assert_eq!(tasks["academic"][0]["task"], "linear algebra ch. 2");
    assert_eq!(tasks["academic"][0]["is_done"], false);
    assert_eq!(tasks["kaggle"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_tomorrow_task_requires_text() {
    let t = build_test_app();
    let response = post_json(
        &t.router,
        "/api/dashboard/tomorrow-task",
        json!({ "type": "academic", "task": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_history_and_day_details() {
    let t = build_test_app();
    get(&t.router, "/api/dashboard/today").await;

    let history = body_json(get(&t.router, "/api/dashboard/history").await).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["consistency_score"], 0);

    let date = Utc::now().date_naive();
    let response = get(&t.router, &format!("/api/dashboard/day/{date}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&t.router, "/api/dashboard/day/2001-01-01").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_heatmap_for_prayers() {
    let t = build_test_app();
    post_json(
        &t.router,
        "/api/dashboard/toggle-prayer",
        json!({ "prayer": "asr" }),
    )
    .await;

    let response = get(&t.router, "/api/dashboard/heatmap?category=prayers").await;
    assert_eq!(response.status(), StatusCode::OK);
    let heatmap = body_json(response).await;
    assert_eq!(heatmap["category"], "prayers");
    assert_eq!(heatmap["entries"][0]["value"], 1.0);
    assert_eq!(heatmap["entries"][0]["max"], 5.0);
    assert_eq!(heatmap["entries"][0]["level"], 1);
    assert_eq!(heatmap["longest_streak"], 1);
}

#[tokio::test]
async fn test_quote_and_badges() {
    let t = build_test_app();
    let quote = body_json(get(&t.router, "/api/dashboard/quote").await).await;
    assert!(quote["text"].is_string());
    assert!(quote["author"].is_string());

    let badges = body_json(get(&t.router, "/api/dashboard/badges").await).await;
    assert!(badges.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Contests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_contest_summary() {
    let t = build_test_app();
    let response = get(&t.router, "/api/dashboard/contests").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let upcoming: Vec<u64> = body["upcoming"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert_eq!(upcoming, vec![2000, 2001]);

    let history: Vec<u64> = body["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert_eq!(history, vec![1996, 1997, 1998]);
    assert_eq!(body["history"][0]["participated"], true);

    let stats = &body["stats"];
    assert_eq!(stats["current_streak"], 3);
    assert_eq!(stats["max_streak"], 3);
    assert_eq!(stats["max_streak_last_month"], 2);
    assert_eq!(stats["total_contests"], 3);
    assert_eq!(stats["participated_contests"], 3);
}

#[tokio::test]
async fn test_contest_summary_empty_when_judge_down() {
    let t = build_test_app_with(
        test_config(),
        StubJudge {
            contests_down: true,
            ..StubJudge::default()
        },
    );
    let response = get(&t.router, "/api/dashboard/contests").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["upcoming"].as_array().unwrap().is_empty());
    assert!(body["history"].as_array().unwrap().is_empty());
    assert_eq!(body["stats"]["max_streak"], 0);
}
