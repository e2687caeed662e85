use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Days between watching an editorial and the scheduled review.
pub const REVIEW_INTERVAL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct RevisionItem {
    pub id: Uuid,
    pub problem_link: String,
    pub watched_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    /// Insertion sequence; breaks ties between equal `due_at` values.
    #[serde(skip)]
    pub seq: i64,
}

impl RevisionItem {
    pub fn new(problem_link: impl Into<String>, watched_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            problem_link: problem_link.into(),
            watched_at,
            due_at: watched_at + Duration::days(REVIEW_INTERVAL_DAYS),
            seq: 0,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EnqueueRequest {
    #[validate(length(min = 1, max = 512, message = "Problem link is required"))]
    pub problem_link: String,
}

#[derive(Debug, Serialize)]
pub struct RevisionQueueResponse {
    pub count: usize,
    pub data: Vec<RevisionItem>,
}
