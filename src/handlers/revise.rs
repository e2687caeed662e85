use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{DeleteResponse, PopResponse, RevisionItemResponse};
use crate::error::AppResult;
use crate::handlers::broadcast_change;
use crate::models::revision::{EnqueueRequest, RevisionItem, RevisionQueueResponse};
use crate::AppState;

pub async fn enqueue(
    State(state): State<AppState>,
    Json(body): Json<EnqueueRequest>,
) -> AppResult<(StatusCode, Json<RevisionItemResponse>)> {
    body.validate()?;
    let item = state.tracker.enqueue(&body.problem_link, Utc::now()).await?;
    broadcast_change(&state, "revise_enqueue");
    Ok((
        StatusCode::CREATED,
        Json(RevisionItemResponse {
            message: "Problem added successfully".into(),
            data: item,
        }),
    ))
}

pub async fn list_queue(State(state): State<AppState>) -> AppResult<Json<RevisionQueueResponse>> {
    let queue = state.tracker.list_queue().await?;
    Ok(Json(queue))
}

pub async fn peek(State(state): State<AppState>) -> AppResult<Json<RevisionItem>> {
    let item = state.tracker.peek().await?;
    Ok(Json(item))
}

pub async fn pop(State(state): State<AppState>) -> AppResult<Json<PopResponse>> {
    let (item, log) = state.tracker.pop(Utc::now()).await?;
    broadcast_change(&state, "revise_pop");
    Ok(Json(PopResponse {
        message: "Problem popped and logged as revised".into(),
        data: item,
        log,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let item = state.tracker.remove(id).await?;
    broadcast_change(&state, "revise_remove");
    Ok(Json(DeleteResponse {
        deleted: true,
        id: item.id,
    }))
}
