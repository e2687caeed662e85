#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;

use consistency_api::config::Config;
use consistency_api::db::{MemoryStore, Store};
use consistency_api::services::contests::{Contest, ContestPhase};
use consistency_api::services::judge::{CandidateProblem, CodingJudge, Submission};
use consistency_api::services::tracker::Tracker;
use consistency_api::{app, AppState};

/// Judge double: six fixed candidates, whatever submissions a test queues,
/// and a contest list where the handle attended the two most recent rounds.
#[derive(Default)]
pub struct StubJudge {
    pub submissions: Mutex<Vec<Submission>>,
    pub contests_down: bool,
    /// Handles passed to the submission endpoints, in call order.
    pub handles_seen: Mutex<Vec<String>>,
    /// When set, submission fetches wait for a permit before answering.
    pub submissions_gate: Option<Arc<Notify>>,
}

impl StubJudge {
    pub fn accept(&self, problem_id: &str) {
        self.accept_at(problem_id, Utc::now());
    }

    pub fn accept_at(&self, problem_id: &str, at: DateTime<Utc>) {
        self.submissions
            .lock()
            .expect("stub lock")
            .push(Submission {
                problem_id: problem_id.to_string(),
                problem_rating: Some(1700),
                accepted: true,
                submitted_at: at,
            });
    }
}

#[async_trait]
impl CodingJudge for StubJudge {
    async fn fetch_candidate_problems(
        &self,
        _rating: u32,
        _solved: &HashSet<&str>,
    ) -> anyhow::Result<Vec<CandidateProblem>> {
        Ok((0..6)
            .map(|i| CandidateProblem {
                id: format!("{}C", 1990 - i),
                name: format!("Stub problem {i}"),
                link: format!("https://codeforces.com/contest/{}/problem/C", 1990 - i),
            })
            .collect())
    }

    async fn fetch_recent_submissions(&self, handle: &str) -> anyhow::Result<Vec<Submission>> {
        self.handles_seen
            .lock()
            .expect("stub lock")
            .push(handle.to_string());
        if let Some(gate) = &self.submissions_gate {
            gate.notified().await;
        }
        Ok(self.submissions.lock().expect("stub lock").clone())
    }

    async fn fetch_all_submissions(&self, handle: &str) -> anyhow::Result<Vec<Submission>> {
        self.handles_seen
            .lock()
            .expect("stub lock")
            .push(handle.to_string());
        Ok(Vec::new())
    }

    async fn fetch_daily_leetcode_link(&self) -> anyhow::Result<String> {
        Ok("https://leetcode.com/problems/two-sum/".into())
    }

    async fn fetch_contests(&self) -> anyhow::Result<Vec<Contest>> {
        if self.contests_down {
            anyhow::bail!("contest list unavailable");
        }
        let now = Utc::now();
        let round = |id: u32, name: &str, phase: ContestPhase, days: i64| Contest {
            id,
            name: name.to_string(),
            phase,
            start_time: now + Duration::days(days),
            duration_seconds: 7200,
        };
        Ok(vec![
            round(2001, "Codeforces Round 1001 (Div. 2)", ContestPhase::Before, 3),
            round(2000, "Educational Codeforces Round 180", ContestPhase::Before, 1),
            round(1999, "Codeforces Round 999 (Div. 1)", ContestPhase::Finished, -2),
            round(1998, "Codeforces Round 998 (Div. 3)", ContestPhase::Finished, -5),
            round(1997, "Codeforces Round 997 (Div. 2)", ContestPhase::Finished, -12),
            round(1996, "Codeforces Round 996 (Div. 4)", ContestPhase::Finished, -40),
        ])
    }

    async fn fetch_rating_history(&self, _handle: &str) -> anyhow::Result<Vec<u32>> {
        Ok(vec![1996, 1997, 1998])
    }
}

/// No rest days, so workout expectations do not depend on the weekday.
/// Days are cut at UTC midnight.
pub fn test_config() -> Config {
    Config {
        rest_days: Vec::new(),
        utc_offset: FixedOffset::east_opt(0).expect("utc offset"),
        ..Config::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub tracker: Tracker,
    pub store: Arc<MemoryStore>,
    pub judge: Arc<StubJudge>,
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config(), StubJudge::default())
}

pub fn build_test_app_with(config: Config, judge: StubJudge) -> TestApp {
    let config = Arc::new(config);
    let store = Arc::new(MemoryStore::new());
    let judge = Arc::new(judge);
    let tracker = Tracker::new(
        store.clone() as Arc<dyn Store>,
        judge.clone() as Arc<dyn CodingJudge>,
        config.clone(),
    );
    TestApp {
        router: app(AppState::new(tracker.clone(), config)),
        tracker,
        store,
        judge,
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");
    app.clone().oneshot(request).await.expect("response")
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
