use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Datelike, NaiveDate, Utc};

use crate::dto::{SubmitDayResponse, TomorrowTaskAddedResponse};
use crate::error::AppResult;
use crate::handlers::broadcast_change;
use crate::models::daily_log::{
    DailyLog, DailyLogQuery, SubmitDayRequest, TogglePrayerRequest, UpdateDailyLogRequest,
};
use crate::models::user_config::{Badge, TomorrowTaskRequest, TomorrowTasksResponse};
use crate::services::calendar::local_date;
use crate::services::contests::ContestSummary;
use crate::services::heatmap::{HeatmapQuery, HeatmapResponse};
use crate::services::quotes::{quote_for_day, Quote};
use crate::AppState;

pub async fn get_today(State(state): State<AppState>) -> AppResult<Json<DailyLog>> {
    let log = state.tracker.today(Utc::now()).await?;
    Ok(Json(log))
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<DailyLogQuery>,
) -> AppResult<Json<Vec<DailyLog>>> {
    let logs = state
        .tracker
        .history(query.start_date, query.end_date, Utc::now())
        .await?;
    Ok(Json(logs))
}

pub async fn get_heatmap(
    State(state): State<AppState>,
    Query(query): Query<HeatmapQuery>,
) -> AppResult<Json<HeatmapResponse>> {
    let heatmap = state.tracker.heatmap(query, Utc::now()).await?;
    Ok(Json(heatmap))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<DailyLog>> {
    let log = state.tracker.day_details(date).await?;
    Ok(Json(log))
}

pub async fn toggle_prayer(
    State(state): State<AppState>,
    Json(body): Json<TogglePrayerRequest>,
) -> AppResult<Json<DailyLog>> {
    let log = state.tracker.toggle_prayer(body.prayer, Utc::now()).await?;
    broadcast_change(&state, "toggle_prayer");
    Ok(Json(log))
}

pub async fn update_today(
    State(state): State<AppState>,
    Json(body): Json<UpdateDailyLogRequest>,
) -> AppResult<Json<DailyLog>> {
    let log = state.tracker.update(body, Utc::now()).await?;
    broadcast_change(&state, "update");
    Ok(Json(log))
}

pub async fn refresh_status(State(state): State<AppState>) -> AppResult<Json<DailyLog>> {
    let log = state.tracker.refresh_status(Utc::now()).await?;
    broadcast_change(&state, "refresh_status");
    Ok(Json(log))
}

pub async fn add_tomorrow_task(
    State(state): State<AppState>,
    Json(body): Json<TomorrowTaskRequest>,
) -> AppResult<Json<TomorrowTaskAddedResponse>> {
    let tasks = state.tracker.add_tomorrow_task(body, Utc::now()).await?;
    Ok(Json(TomorrowTaskAddedResponse {
        message: "Task added for tomorrow".into(),
        tasks,
    }))
}

pub async fn get_tomorrow_tasks(
    State(state): State<AppState>,
) -> AppResult<Json<TomorrowTasksResponse>> {
    let tasks = state.tracker.tomorrow_tasks().await?;
    Ok(Json(tasks))
}

pub async fn submit_day(
    State(state): State<AppState>,
    Json(body): Json<SubmitDayRequest>,
) -> AppResult<Json<SubmitDayResponse>> {
    let (log, new_badges) = state.tracker.submit_day(body, Utc::now()).await?;
    broadcast_change(&state, "submit_day");
    Ok(Json(SubmitDayResponse {
        message: "Day submitted successfully".into(),
        log,
        new_badges,
    }))
}

pub async fn get_badges(State(state): State<AppState>) -> AppResult<Json<Vec<Badge>>> {
    let badges = state.tracker.badges().await?;
    Ok(Json(badges))
}

pub async fn get_contests(State(state): State<AppState>) -> AppResult<Json<ContestSummary>> {
    let summary = state.tracker.contests(Utc::now()).await?;
    Ok(Json(summary))
}

pub async fn get_quote(State(state): State<AppState>) -> Json<Quote> {
    let today = local_date(Utc::now(), state.config.utc_offset);
    Json(*quote_for_day(today.ordinal()))
}
