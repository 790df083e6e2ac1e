//! Suggestion Generator: 2 to 4 follow-up questions for the last exchange.
//!
//! `Llm` asks Gemini for follow-ups and degrades to the keyword templates on
//! any error or when fewer than two usable suggestions come back. `Keyword`
//! never calls out.

pub mod keywords;
pub mod prompts;

use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;

pub const MIN_SUGGESTIONS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 4;
/// Number of keyword-template suggestions produced per turn.
const KEYWORD_SUGGESTIONS: usize = 3;
const MAX_SUGGESTION_CHARS: usize = 120;

/// The latest user message and the reply it received.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub user: &'a str,
    pub reply: &'a str,
}

#[derive(Clone)]
pub enum SuggestionGenerator {
    Llm(LlmClient),
    Keyword,
}

impl SuggestionGenerator {
    pub fn kind(&self) -> &'static str {
        match self {
            SuggestionGenerator::Llm(_) => "llm",
            SuggestionGenerator::Keyword => "keyword",
        }
    }

    pub async fn suggest(&self, exchange: &Exchange<'_>) -> Vec<String> {
        match self {
            SuggestionGenerator::Llm(llm) => match llm_suggestions(llm, exchange).await {
                Some(suggestions) => suggestions,
                None => keywords::keyword_suggestions(exchange, KEYWORD_SUGGESTIONS),
            },
            SuggestionGenerator::Keyword => {
                keywords::keyword_suggestions(exchange, KEYWORD_SUGGESTIONS)
            }
        }
    }
}

async fn llm_suggestions(llm: &LlmClient, exchange: &Exchange<'_>) -> Option<Vec<String>> {
    let prompt = prompts::suggestion_prompt(exchange);
    match llm.call_json::<Vec<String>>(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(raw) => {
            let cleaned = sanitize(raw);
            if cleaned.len() < MIN_SUGGESTIONS {
                warn!("LLM returned {} usable suggestions, using keywords", cleaned.len());
                None
            } else {
                Some(cleaned)
            }
        }
        Err(e) => {
            warn!("LLM suggestion call failed, using keywords: {e}");
            None
        }
    }
}

/// Trims, drops blank or overlong entries and duplicates, caps at four.
fn sanitize(raw: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for suggestion in raw {
        let suggestion = suggestion.trim();
        if suggestion.is_empty() || suggestion.chars().count() > MAX_SUGGESTION_CHARS {
            continue;
        }
        if cleaned.iter().any(|s| s.eq_ignore_ascii_case(suggestion)) {
            continue;
        }
        cleaned.push(suggestion.to_string());
        if cleaned.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    cleaned
}
