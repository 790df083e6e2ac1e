use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Pushover application token and user key. Both must be present for
/// notifications to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushoverCredentials {
    pub token: String,
    pub user: String,
}

/// Application configuration loaded from environment variables.
/// Every external credential is optional: a missing key narrows behavior
/// instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub pushover: Option<PushoverCredentials>,
    pub persona_name: String,
    pub knowledge_dir: PathBuf,
    pub port: u16,
    /// Idle time after which a chat session is dropped.
    pub session_idle_ttl: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let pushover = match (optional_env("PUSHOVER_TOKEN"), optional_env("PUSHOVER_USER")) {
            (Some(token), Some(user)) => Some(PushoverCredentials { token, user }),
            _ => None,
        };

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            pushover,
            persona_name: optional_env("PERSONA_NAME")
                .unwrap_or_else(|| "the candidate".to_string()),
            knowledge_dir: optional_env("KNOWLEDGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("me")),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            session_idle_ttl: Duration::from_secs(
                optional_env("SESSION_IDLE_MINUTES")
                    .unwrap_or_else(|| "30".to_string())
                    .parse::<u64>()
                    .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?
                    * 60,
            ),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Reads an environment variable, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
