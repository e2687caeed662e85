//! Coding-judge collaborator (Codeforces, plus the LeetCode daily question).
//!
//! Every call can fail; callers treat failures as soft and keep going.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::Config;
use crate::models::daily_log::{DailyLog, ProblemStatus, TrackedProblem};
use crate::services::contests::{Contest, ContestPhase};

/// Problems handed out per day.
pub const DAILY_PROBLEM_COUNT: usize = 6;
/// Older contests are skipped when picking targets.
pub const MIN_CONTEST_ID: u32 = 900;
/// Distinct accepted problems at a level before moving up.
pub const LEVEL_UP_SOLVES: usize = 200;
pub const LEVEL_STEP: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProblem {
    pub id: String,
    pub name: String,
    pub link: String,
}

impl From<CandidateProblem> for TrackedProblem {
    fn from(p: CandidateProblem) -> Self {
        TrackedProblem {
            problem_id: p.id,
            name: p.name,
            link: p.link,
            status: ProblemStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub problem_id: String,
    pub problem_rating: Option<u32>,
    pub accepted: bool,
    pub submitted_at: DateTime<Utc>,
}

#[async_trait]
pub trait CodingJudge: Send + Sync {
    /// Problems at `rating` the handle has not solved yet.
    async fn fetch_candidate_problems(
        &self,
        rating: u32,
        solved: &HashSet<&str>,
    ) -> anyhow::Result<Vec<CandidateProblem>>;

    async fn fetch_recent_submissions(&self, handle: &str) -> anyhow::Result<Vec<Submission>>;

    /// Full submission history, used for rating progression and the solved set.
    async fn fetch_all_submissions(&self, handle: &str) -> anyhow::Result<Vec<Submission>>;

    async fn fetch_daily_leetcode_link(&self) -> anyhow::Result<String>;

    /// Every non-gym contest the judge lists.
    async fn fetch_contests(&self) -> anyhow::Result<Vec<Contest>>;

    /// Ids of the rated contests the handle took part in.
    async fn fetch_rating_history(&self, handle: &str) -> anyhow::Result<Vec<u32>>;
}

// ── Pure helpers ─────────────────────────────────────────────────────────────

pub fn problem_key(contest_id: u32, index: &str) -> String {
    format!("{contest_id}{index}")
}

pub fn contest_problem_link(contest_id: u32, index: &str) -> String {
    format!("https://codeforces.com/contest/{contest_id}/problem/{index}")
}

pub fn solved_set(submissions: &[Submission]) -> HashSet<&str> {
    submissions
        .iter()
        .filter(|s| s.accepted)
        .map(|s| s.problem_id.as_str())
        .collect()
}

/// Raises the level while the handle has enough distinct solves at it.
/// Returns the resulting level and the distinct solve count there.
pub fn progress_rating(submissions: &[Submission], current: u32) -> (u32, u32) {
    let solved_at = |rating: u32| {
        submissions
            .iter()
            .filter(|s| s.accepted && s.problem_rating == Some(rating))
            .map(|s| s.problem_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    };

    let mut rating = current;
    let mut count = solved_at(rating);
    while count >= LEVEL_UP_SOLVES {
        rating += LEVEL_STEP;
        count = solved_at(rating);
    }
    (rating, count as u32)
}

/// Marks pending targets and revisions solved when an accepted submission
/// for the same problem landed at or after `since`, the start of the log's
/// day. Returns whether anything changed.
pub fn apply_submissions(
    log: &mut DailyLog,
    submissions: &[Submission],
    since: DateTime<Utc>,
) -> bool {
    let accepted: HashSet<&str> = submissions
        .iter()
        .filter(|s| s.accepted && s.submitted_at >= since)
        .map(|s| s.problem_id.as_str())
        .collect();

    let mut changed = false;
    for problem in log
        .codeforces
        .target_problems
        .iter_mut()
        .chain(log.revision.problems.iter_mut())
    {
        if problem.status == ProblemStatus::Pending && accepted.contains(problem.problem_id.as_str())
        {
            problem.status = ProblemStatus::Solved;
            changed = true;
        }
    }
    changed
}

// ── Codeforces / LeetCode HTTP client ────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CfEnvelope<T> {
    status: String,
    result: Option<T>,
    comment: Option<String>,
}

impl<T> CfEnvelope<T> {
    fn into_result(self) -> anyhow::Result<T> {
        if self.status != "OK" {
            anyhow::bail!(
                "Codeforces API error: {}",
                self.comment.unwrap_or_else(|| self.status.clone())
            );
        }
        self.result
            .ok_or_else(|| anyhow::anyhow!("Codeforces API returned no result"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfProblem {
    contest_id: Option<u32>,
    index: String,
    name: String,
    rating: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CfProblemset {
    problems: Vec<CfProblem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfSubmission {
    creation_time_seconds: i64,
    problem: CfProblem,
    verdict: Option<String>,
}

impl CfSubmission {
    fn into_submission(self) -> Option<Submission> {
        let contest_id = self.problem.contest_id?;
        Some(Submission {
            problem_id: problem_key(contest_id, &self.problem.index),
            problem_rating: self.problem.rating,
            accepted: self.verdict.as_deref() == Some("OK"),
            submitted_at: DateTime::from_timestamp(self.creation_time_seconds, 0)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfContest {
    id: u32,
    name: String,
    phase: String,
    start_time_seconds: Option<i64>,
    #[serde(default)]
    duration_seconds: i64,
}

impl CfContest {
    fn into_contest(self) -> Option<Contest> {
        let phase = match self.phase.as_str() {
            "BEFORE" => ContestPhase::Before,
            "FINISHED" => ContestPhase::Finished,
            _ => ContestPhase::Running,
        };
        Some(Contest {
            id: self.id,
            name: self.name,
            phase,
            start_time: DateTime::from_timestamp(self.start_time_seconds?, 0)?,
            duration_seconds: self.duration_seconds,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfRatingChange {
    contest_id: u32,
}

fn select_candidates(
    problems: Vec<CfProblem>,
    solved: &HashSet<&str>,
    rating: u32,
) -> Vec<CandidateProblem> {
    let mut candidates: Vec<(u32, CfProblem)> = problems
        .into_iter()
        .filter(|p| p.rating == Some(rating))
        .filter_map(|p| p.contest_id.map(|c| (c, p)))
        .filter(|(c, p)| *c >= MIN_CONTEST_ID && !solved.contains(problem_key(*c, &p.index).as_str()))
        .collect();

    // Newest contests first; stable so problem order within a contest is kept.
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    candidates
        .into_iter()
        .take(DAILY_PROBLEM_COUNT)
        .map(|(contest_id, p)| CandidateProblem {
            id: problem_key(contest_id, &p.index),
            link: contest_problem_link(contest_id, &p.index),
            name: p.name,
        })
        .collect()
}

pub struct CodeforcesClient {
    http: reqwest::Client,
    api_url: String,
    leetcode_url: String,
}

impl CodeforcesClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_url: config.codeforces_api_url.trim_end_matches('/').to_string(),
            leetcode_url: config.leetcode_graphql_url.clone(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let response = self
            .http
            .get(format!("{}/{}", self.api_url, path))
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Codeforces HTTP {}: {}", status, body);
        }

        response.json::<CfEnvelope<T>>().await?.into_result()
    }

    async fn submissions(&self, handle: &str, count: Option<u32>) -> anyhow::Result<Vec<Submission>> {
        let mut query = vec![("handle", handle.to_string())];
        if let Some(count) = count {
            query.push(("from", "1".into()));
            query.push(("count", count.to_string()));
        }
        let raw: Vec<CfSubmission> = self.get("user.status", &query).await?;
        Ok(raw.into_iter().filter_map(CfSubmission::into_submission).collect())
    }
}

#[async_trait]
impl CodingJudge for CodeforcesClient {
    async fn fetch_candidate_problems(
        &self,
        rating: u32,
        solved: &HashSet<&str>,
    ) -> anyhow::Result<Vec<CandidateProblem>> {
        let problemset: CfProblemset = self.get("problemset.problems", &[]).await?;
        Ok(select_candidates(problemset.problems, solved, rating))
    }

    async fn fetch_recent_submissions(&self, handle: &str) -> anyhow::Result<Vec<Submission>> {
        self.submissions(handle, Some(50)).await
    }

    async fn fetch_all_submissions(&self, handle: &str) -> anyhow::Result<Vec<Submission>> {
        self.submissions(handle, None).await
    }

    async fn fetch_daily_leetcode_link(&self) -> anyhow::Result<String> {
        let query = r#"
            query questionOfToday {
                activeDailyCodingChallengeQuestion {
                    link
                }
            }
        "#;
        let response = self
            .http
            .post(&self.leetcode_url)
            .header("content-type", "application/json")
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("LeetCode HTTP {}", response.status());
        }

        let body: serde_json::Value = response.json().await?;
        let link = body["data"]["activeDailyCodingChallengeQuestion"]["link"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("LeetCode response missing daily question link"))?;
        Ok(format!("https://leetcode.com{link}"))
    }

    async fn fetch_contests(&self) -> anyhow::Result<Vec<Contest>> {
        let raw: Vec<CfContest> = self
            .get("contest.list", &[("gym", "false".to_string())])
            .await?;
        Ok(raw.into_iter().filter_map(CfContest::into_contest).collect())
    }

    async fn fetch_rating_history(&self, handle: &str) -> anyhow::Result<Vec<u32>> {
        let raw: Vec<CfRatingChange> = self
            .get("user.rating", &[("handle", handle.to_string())])
            .await?;
        Ok(raw.into_iter().map(|r| r.contest_id).collect())
    }
}
