//! Local fallback responder: ordered keyword rules over the Knowledge Store.
//!
//! Rules, first match wins:
//! 1. contact details (email or phone) → record_user_details, acknowledge
//! 2. topic keyword → snippet from the matching knowledge section
//! 3. anything else → record_unknown_question, generic reply
//!
//! A message carrying both contact details and a topic keyword is treated as
//! contact details.

use tracing::debug;

use crate::knowledge::{KnowledgeStore, Topic};
use crate::responder::contact::extract_contact;
use crate::responder::{Reply, ReplySource};
use crate::session::Conversation;
use crate::tools::{ContactRecord, ToolHandlers, ToolName, UnansweredQuestion};

#[derive(Debug, Clone)]
pub struct FallbackResponder {
    persona_name: String,
}

impl FallbackResponder {
    pub fn new(persona_name: impl Into<String>) -> Self {
        Self {
            persona_name: persona_name.into(),
        }
    }

    /// Replies to the latest user message of `conversation`.
    pub async fn respond(
        &self,
        conversation: &Conversation,
        knowledge: &KnowledgeStore,
        tools: &ToolHandlers,
    ) -> Reply {
        self.respond_after(conversation, knowledge, tools, &[]).await
    }

    /// Like `respond`, for a turn in which `already_run` tools have fired.
    /// The reply text is the same; a tool that already ran is not run again,
    /// and no unanswered question is logged once any tool has run.
    pub async fn respond_after(
        &self,
        conversation: &Conversation,
        knowledge: &KnowledgeStore,
        tools: &ToolHandlers,
        already_run: &[ToolName],
    ) -> Reply {
        let message = conversation.last_user_text().unwrap_or_default();
        self.reply_after(message, knowledge, tools, already_run).await
    }

    pub async fn reply_to(
        &self,
        message: &str,
        knowledge: &KnowledgeStore,
        tools: &ToolHandlers,
    ) -> Reply {
        self.reply_after(message, knowledge, tools, &[]).await
    }

    async fn reply_after(
        &self,
        message: &str,
        knowledge: &KnowledgeStore,
        tools: &ToolHandlers,
        already_run: &[ToolName],
    ) -> Reply {
        let mut tools_invoked = already_run.to_vec();

        if let Some(contact) = extract_contact(message) {
            debug!("Fallback rule: contact details");
            if !already_run.contains(&ToolName::RecordUserDetails) {
                tools.record_user_details(&contact).await;
                tools_invoked.push(ToolName::RecordUserDetails);
            }
            return Reply {
                text: self.contact_acknowledgement(&contact),
                tools_invoked,
                source: ReplySource::Fallback,
            };
        }

        if let Some(topic) = Topic::detect(message) {
            debug!("Fallback rule: topic {topic:?}");
            return Reply {
                text: self.topic_reply(topic, knowledge),
                tools_invoked,
                source: ReplySource::Fallback,
            };
        }

        debug!("Fallback rule: unanswered question");
        if already_run.is_empty() {
            tools
                .record_unknown_question(&UnansweredQuestion {
                    question: message.to_string(),
                })
                .await;
            tools_invoked.push(ToolName::RecordUnknownQuestion);
        }
        Reply {
            text: format!(
                "I don't have that information right now. I've noted your question so {} can \
                 follow up. Feel free to leave your email if you'd like a direct reply.",
                self.persona_name
            ),
            tools_invoked,
            source: ReplySource::Fallback,
        }
    }

    fn contact_acknowledgement(&self, contact: &ContactRecord) -> String {
        let greeting = contact
            .name
            .as_deref()
            .map(|n| format!(", {n}"))
            .unwrap_or_default();
        let detail = contact
            .email
            .as_deref()
            .or(contact.phone.as_deref())
            .unwrap_or("contact details");
        format!(
            "Thanks{greeting}! I've received your contact details ({detail}) and passed them on \
             to {}, who will be in touch soon.",
            self.persona_name
        )
    }

    fn topic_reply(&self, topic: Topic, knowledge: &KnowledgeStore) -> String {
        let name = &self.persona_name;
        match (topic, knowledge.snippet_for(topic)) {
            (Topic::Contact, Some(snippet)) => format!(
                "You can reach {name} here:\n\n{snippet}\n\nOr leave your email address in this \
                 chat and {name} will get back to you."
            ),
            (Topic::Contact, None) => format!(
                "The easiest way to reach {name} is to leave your email address in this chat, \
                 and {name} will get back to you."
            ),
            (topic, Some(snippet)) => {
                format!("Here's what I can share about {name}'s {}:\n\n{snippet}", topic.label())
            }
            (topic, None) => format!(
                "I don't have details about {name}'s {} loaded right now. Leave your email and \
                 {name} can follow up directly.",
                topic.label()
            ),
        }
    }
}
