use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use tokio::sync::broadcast;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use config::Config;
use services::tracker::Tracker;

#[derive(Clone)]
pub struct AppState {
    pub tracker: Tracker,
    pub config: Arc<Config>,
    pub ws_tx: Option<broadcast::Sender<String>>,
}

impl AppState {
    pub fn new(tracker: Tracker, config: Arc<Config>) -> Self {
        let (ws_tx, _) = broadcast::channel::<String>(256);
        Self {
            tracker,
            config,
            ws_tx: Some(ws_tx),
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .frontend_url
        .split(',')
        .filter_map(|o| o.trim().parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

pub fn app(state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/today", get(handlers::dashboard::get_today))
        .route("/history", get(handlers::dashboard::get_history))
        .route("/heatmap", get(handlers::dashboard::get_heatmap))
        .route("/day/:date", get(handlers::dashboard::get_day))
        .route("/toggle-prayer", post(handlers::dashboard::toggle_prayer))
        .route("/update", patch(handlers::dashboard::update_today))
        .route("/refresh-status", post(handlers::dashboard::refresh_status))
        .route("/tomorrow-task", post(handlers::dashboard::add_tomorrow_task))
        .route("/tomorrow-tasks", get(handlers::dashboard::get_tomorrow_tasks))
        .route("/submit-day", post(handlers::dashboard::submit_day))
        .route("/badges", get(handlers::dashboard::get_badges))
        .route("/contests", get(handlers::dashboard::get_contests))
        .route("/quote", get(handlers::dashboard::get_quote));

    let revise_routes = Router::new()
        .route(
            "/",
            post(handlers::revise::enqueue).get(handlers::revise::list_queue),
        )
        .route("/peek", get(handlers::revise::peek))
        .route("/pop", delete(handlers::revise::pop))
        .route("/:id", delete(handlers::revise::remove));

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/ws", get(handlers::ws::ws_handler))
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/revise", revise_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
