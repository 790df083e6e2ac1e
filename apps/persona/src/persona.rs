use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::knowledge::KnowledgeStore;
use crate::llm_client::{self, LlmClient};
use crate::notifier::Notifier;
use crate::responder::{FallbackResponder, LlmResponder, Responder};
use crate::suggestions::SuggestionGenerator;
use crate::tools::ToolHandlers;

/// Process-scoped chat services, built once in `main` and shared by every
/// session. Nothing here is mutated after construction.
pub struct Persona {
    pub name: String,
    pub knowledge: Arc<KnowledgeStore>,
    pub responder: Responder,
    pub suggester: SuggestionGenerator,
    pub tools: ToolHandlers,
}

impl Persona {
    /// Picks the LLM strategies when a Gemini key is configured and the
    /// keyword strategies otherwise.
    pub fn from_config(
        config: &Config,
        knowledge: KnowledgeStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let name = config.persona_name.clone();
        let (responder, suggester) = match &config.gemini_api_key {
            Some(key) => {
                let llm = LlmClient::new(key.clone());
                info!("LLM responder enabled (model: {})", llm_client::MODEL);
                (
                    Responder::Llm(LlmResponder::new(llm.clone(), name.clone())),
                    SuggestionGenerator::Llm(llm),
                )
            }
            None => {
                info!("GEMINI_API_KEY not set, using keyword fallback responder");
                (
                    Responder::Fallback(FallbackResponder::new(name.clone())),
                    SuggestionGenerator::Keyword,
                )
            }
        };

        Self {
            name,
            knowledge: Arc::new(knowledge),
            responder,
            suggester,
            tools: ToolHandlers::new(notifier),
        }
    }
}
