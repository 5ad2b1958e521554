//! HTTP handlers for the conversation page and the session JSON API.
//!
//! The page routes (`/session/*`) answer browser form posts with a redirect
//! back to `/`. A failed remote call there is not shown to the user: the
//! controller has already logged it and broadcast it, and the page simply
//! re-renders without the waiting placeholder. The JSON routes
//! (`/api/session/*`) report the same failure as a `502`.
//!
//! Calls that reach the booking service run on their own task. A client
//! that disconnects mid-call drops only the wait for the result, so the
//! session still leaves `Awaiting` when the call finishes.

use crate::AppState;
use axum::{
    extract::{Extension, Multipart},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use voicebook_client::BookingApi;
use voicebook_session::{AudioClip, SessionError, SessionSnapshot};
use voicebook_ui::{render_page, View};

/// Multipart field the recording widget uploads its audio under.
pub const RECORDING_FIELD: &str = "file";

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad gateway: {0}")]
    BadGateway(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
            SessionError::Remote(_) => ApiError::BadGateway(err.to_string()),
            SessionError::Audio(_) | SessionError::LockPoisoned => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Pulls the recorded audio out of a multipart upload.
///
/// Takes the field named [`RECORDING_FIELD`], or failing that the first
/// field that carries a file name.
async fn read_recording(mut multipart: Multipart, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))?
    {
        let is_recording =
            field.name() == Some(RECORDING_FIELD) || field.file_name().is_some();
        if !is_recording {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)))?;

        if data.is_empty() {
            return Err(ApiError::BadRequest("recording is empty".to_string()));
        }
        if data.len() > max_bytes {
            return Err(ApiError::BadRequest(format!(
                "recording too large: {} bytes (max {})",
                data.len(),
                max_bytes
            )));
        }

        return Ok(data.to_vec());
    }

    Err(ApiError::BadRequest("no recording provided".to_string()))
}

/// Keeps invalid transitions and internal failures, drops remote failures.
fn swallow_remote(result: Result<(), SessionError>) -> Result<(), ApiError> {
    match result {
        Ok(()) | Err(SessionError::Remote(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Spawns a controller call and waits for its outcome.
async fn run_detached<F>(call: F) -> Result<Result<(), SessionError>, ApiError>
where
    F: Future<Output = Result<(), SessionError>> + Send + 'static,
{
    tokio::spawn(call)
        .await
        .map_err(|e| ApiError::InternalServerError(format!("task join error: {}", e)))
}

async fn start<A: BookingApi>(state: &AppState<A>) -> Result<Result<(), SessionError>, ApiError> {
    let controller = state.controller.clone();
    run_detached(async move { controller.start_session().await }).await
}

async fn submit<A: BookingApi>(
    state: &AppState<A>,
    audio: Vec<u8>,
) -> Result<Result<(), SessionError>, ApiError> {
    let controller = state.controller.clone();
    run_detached(async move {
        controller
            .submit_recording(AudioClip::Bytes(audio))
            .await
    })
    .await
}

/// Handler for `GET /`.
pub async fn page_handler<A: BookingApi>(
    Extension(state): Extension<Arc<AppState<A>>>,
) -> Result<Html<String>, ApiError> {
    let snapshot = state.controller.snapshot()?;
    Ok(Html(render_page(&View::from_snapshot(&snapshot))))
}

/// Handler for `POST /session/start`.
pub async fn start_form_handler<A: BookingApi>(
    Extension(state): Extension<Arc<AppState<A>>>,
) -> Result<Redirect, ApiError> {
    swallow_remote(start(&state).await?)?;
    Ok(Redirect::to("/"))
}

/// Handler for `POST /session/recording`.
pub async fn recording_form_handler<A: BookingApi>(
    Extension(state): Extension<Arc<AppState<A>>>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let audio = read_recording(multipart, state.max_upload_bytes).await?;
    swallow_remote(submit(&state, audio).await?)?;
    Ok(Redirect::to("/"))
}

/// Handler for `POST /session/reset`.
pub async fn reset_form_handler<A: BookingApi>(
    Extension(state): Extension<Arc<AppState<A>>>,
) -> Result<Redirect, ApiError> {
    state.controller.reset()?;
    Ok(Redirect::to("/"))
}

/// Handler for `GET /api/session`.
pub async fn get_session_handler<A: BookingApi>(
    Extension(state): Extension<Arc<AppState<A>>>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.controller.snapshot()?))
}

/// Handler for `POST /api/session/start`.
pub async fn start_session_handler<A: BookingApi>(
    Extension(state): Extension<Arc<AppState<A>>>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    start(&state).await??;
    Ok(Json(state.controller.snapshot()?))
}

/// Handler for `POST /api/session/recording`.
pub async fn submit_recording_handler<A: BookingApi>(
    Extension(state): Extension<Arc<AppState<A>>>,
    multipart: Multipart,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let audio = read_recording(multipart, state.max_upload_bytes).await?;
    submit(&state, audio).await??;
    Ok(Json(state.controller.snapshot()?))
}

/// Handler for `POST /api/session/reset`.
pub async fn reset_session_handler<A: BookingApi>(
    Extension(state): Extension<Arc<AppState<A>>>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state.controller.reset()?;
    Ok(Json(state.controller.snapshot()?))
}
