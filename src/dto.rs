//! Response envelopes shared by the dashboard and revise handlers.
//!
//! Request bodies live next to the models they patch.

use serde::Serialize;
use uuid::Uuid;

use crate::models::daily_log::DailyLog;
use crate::models::revision::RevisionItem;
use crate::models::user_config::{Badge, TomorrowTasksResponse};

/// POST /api/revise
#[derive(Debug, Serialize)]
pub struct RevisionItemResponse {
    pub message: String,
    pub data: RevisionItem,
}

/// DELETE /api/revise/pop
#[derive(Debug, Serialize)]
pub struct PopResponse {
    pub message: String,
    pub data: RevisionItem,
    pub log: DailyLog,
}

/// DELETE /api/revise/:id
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

/// POST /api/dashboard/submit-day
#[derive(Debug, Serialize)]
pub struct SubmitDayResponse {
    pub message: String,
    pub log: DailyLog,
    pub new_badges: Vec<Badge>,
}

/// POST /api/dashboard/tomorrow-task
#[derive(Debug, Serialize)]
pub struct TomorrowTaskAddedResponse {
    pub message: String,
    pub tasks: TomorrowTasksResponse,
}
