use std::sync::Arc;

use crate::config::Config;
use crate::persona::Persona;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Knowledge, responder, suggestion and tool strategies, fixed at startup.
    pub persona: Arc<Persona>,
    pub sessions: SessionStore,
    pub config: Config,
}
