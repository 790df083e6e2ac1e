mod config;
mod errors;
mod knowledge;
mod llm_client;
mod notifier;
mod persona;
mod responder;
mod routes;
mod session;
mod state;
mod suggestions;
mod tools;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::knowledge::KnowledgeStore;
use crate::notifier::PushoverNotifier;
use crate::persona::Persona;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Persona v{}", env!("CARGO_PKG_VERSION"));

    // Load knowledge documents (missing files are skipped, never fatal)
    let knowledge = KnowledgeStore::load(&config.knowledge_dir);
    if knowledge.is_empty() {
        warn!(
            "No knowledge documents found in {}",
            config.knowledge_dir.display()
        );
    } else {
        info!("Loaded {} knowledge document(s)", knowledge.documents().len());
    }

    // Initialize notifier (disabled without Pushover credentials)
    let notifier = PushoverNotifier::new(config.pushover.clone());
    if !notifier.is_enabled() {
        warn!("Pushover credentials not set, notifications disabled");
    }

    let persona = Persona::from_config(&config, knowledge, Arc::new(notifier));
    info!("Chatting as {}", persona.name);

    // Session table with idle eviction
    let sessions = SessionStore::with_idle_ttl(config.session_idle_ttl);
    sessions.spawn_sweeper();

    // Build app state
    let state = AppState {
        persona: Arc::new(persona),
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
