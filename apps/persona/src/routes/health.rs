use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and which strategies were selected at startup.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let active_sessions = state.sessions.len().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "persona",
        "responder": state.persona.responder.kind(),
        "suggestions": state.persona.suggester.kind(),
        "notifications": state.config.pushover.is_some(),
        "knowledge_documents": state.persona.knowledge.documents().len(),
        "active_sessions": active_sessions,
    }))
}
