use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::persona::Persona;
use crate::responder::ReplySource;
use crate::session::conversation::{Conversation, ConversationError, Message};
use crate::suggestions::Exchange;

/// What the UI renders after a turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutput {
    pub reply: String,
    pub suggestions: Vec<String>,
    pub source: ReplySource,
}

/// Owns one client's conversation and runs its turns.
pub struct SessionController {
    persona: Arc<Persona>,
    conversation: Conversation,
}

impl SessionController {
    pub fn new(persona: Arc<Persona>) -> Self {
        Self {
            persona,
            conversation: Conversation::new(),
        }
    }

    /// user message → responder → assistant message → suggestions
    pub async fn handle_user_message(&mut self, text: &str) -> Result<TurnOutput, ConversationError> {
        if self.conversation.is_empty() {
            debug!("First turn of a new conversation");
        }
        self.conversation.push_user(text)?;

        let persona = &self.persona;
        let reply = persona
            .responder
            .respond(&self.conversation, &persona.knowledge, &persona.tools)
            .await;
        info!(
            source = ?reply.source,
            tools = ?reply.tools_invoked,
            "Turn {} answered",
            self.conversation.len() / 2 + 1
        );

        self.conversation.push_assistant(reply.text.clone())?;

        let suggestions = persona
            .suggester
            .suggest(&Exchange {
                user: text,
                reply: &reply.text,
            })
            .await;

        Ok(TurnOutput {
            reply: reply.text,
            suggestions,
            source: reply.source,
        })
    }

    pub fn transcript(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn reset(&mut self) {
        self.conversation.clear();
    }
}
