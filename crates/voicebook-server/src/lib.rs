//! Voicebook front-end library logic.
//!
//! Hosts one [`SessionController`] behind an axum router: the rendered
//! conversation page with its form actions, a JSON view of the same
//! session, and a Server-Sent Events stream of session events.

pub mod api;
pub mod api_sse;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use voicebook_client::BookingApi;
use voicebook_session::SessionController;
use voicebook_ui::html::{EVENTS_PATH, RECORDING_PATH, RESET_PATH, START_PATH};

/// Headroom on top of the recording limit for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across all request handlers.
pub struct AppState<A: BookingApi> {
    /// The single conversation this front end serves.
    pub controller: Arc<SessionController<A>>,
    /// Largest accepted recording, in bytes.
    pub max_upload_bytes: usize,
}

impl<A: BookingApi> AppState<A> {
    pub fn new(controller: SessionController<A>, max_upload_bytes: usize) -> Self {
        Self {
            controller: Arc::new(controller),
            max_upload_bytes,
        }
    }
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app<A: BookingApi>(state: AppState<A>) -> Router {
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health))
        .route("/", get(api::page_handler::<A>))
        .route(START_PATH, post(api::start_form_handler::<A>))
        .route(RECORDING_PATH, post(api::recording_form_handler::<A>))
        .route(RESET_PATH, post(api::reset_form_handler::<A>))
        .route("/api/session", get(api::get_session_handler::<A>))
        .route("/api/session/start", post(api::start_session_handler::<A>))
        .route(
            "/api/session/recording",
            post(api::submit_recording_handler::<A>),
        )
        .route("/api/session/reset", post(api::reset_session_handler::<A>))
        .route(
            EVENTS_PATH,
            get(api_sse::get_session_stream_handler::<A>),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
