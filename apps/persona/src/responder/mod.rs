// Responder: produces the assistant's reply to the latest user message.
// The strategy is chosen once at startup: LLM-backed when a Gemini key is
// configured, keyword fallback otherwise.

pub mod contact;
pub mod fallback;
pub mod llm;
pub mod prompts;

use serde::Serialize;

use crate::knowledge::KnowledgeStore;
use crate::session::Conversation;
use crate::tools::{ToolHandlers, ToolName};

pub use fallback::FallbackResponder;
pub use llm::LlmResponder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Llm,
    Fallback,
}

/// A reply plus the tools run while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub tools_invoked: Vec<ToolName>,
    pub source: ReplySource,
}

#[derive(Clone)]
pub enum Responder {
    Llm(LlmResponder),
    Fallback(FallbackResponder),
}

impl Responder {
    pub fn kind(&self) -> &'static str {
        match self {
            Responder::Llm(_) => "llm",
            Responder::Fallback(_) => "fallback",
        }
    }

    pub async fn respond(
        &self,
        conversation: &Conversation,
        knowledge: &KnowledgeStore,
        tools: &ToolHandlers,
    ) -> Reply {
        match self {
            Responder::Llm(r) => r.respond(conversation, knowledge, tools).await,
            Responder::Fallback(r) => r.respond(conversation, knowledge, tools).await,
        }
    }
}
