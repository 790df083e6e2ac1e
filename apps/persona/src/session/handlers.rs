//! Axum route handlers for the session API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::store::SharedSession;
use crate::session::{Message, TurnOutput};
use crate::state::AppState;

const MAX_MESSAGE_CHARS: usize = 2000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: Uuid,
    pub messages: Vec<Message>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create(state.persona.clone()).await;
    tracing::info!("Session {session_id} started");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// POST /api/v1/sessions/:id/messages
///
/// Runs one turn. The turn is spawned so it completes (and the transcript
/// stays alternating) even if the client disconnects mid-request.
pub async fn handle_post_message(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<PostMessageRequest>,
) -> Result<Json<TurnOutput>, AppError> {
    let text = request.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "text cannot exceed {MAX_MESSAGE_CHARS} characters"
        )));
    }

    let session = find_session(&state, session_id).await?;
    let output = tokio::spawn(async move {
        let mut controller = session.lock().await;
        controller.handle_user_message(&text).await
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    Ok(Json(output))
}

/// GET /api/v1/sessions/:id/messages
pub async fn handle_get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let session = find_session(&state, session_id).await?;
    let messages = session.lock().await.transcript().to_vec();
    Ok(Json(TranscriptResponse {
        session_id,
        messages,
    }))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, session_id).await?;
    session.lock().await.reset();
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(session_id).await {
        tracing::info!("Session {session_id} ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

async fn find_session(state: &AppState, session_id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}
