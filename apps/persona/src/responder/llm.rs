//! LLM-backed responder with Gemini function calling.
//!
//! Flow per turn:
//!   conversation + system prompt + tool declarations → generateContent
//!   → while the model requests function calls: run each tool, send the
//!     results back as function responses
//!   → final text reply
//!
//! Any LlmError ends the attempt and the turn is answered by the fallback
//! responder instead. Tools the model already ran are not run a second time
//! by the fallback.

use serde_json::json;
use tracing::{info, warn};

use crate::knowledge::KnowledgeStore;
use crate::llm_client::{Content, GenerateRequest, LlmClient, LlmError, Part, ToolSet};
use crate::responder::fallback::FallbackResponder;
use crate::responder::prompts::system_prompt;
use crate::responder::{Reply, ReplySource};
use crate::session::{Conversation, Role};
use crate::tools::{self, ToolAck, ToolCall, ToolHandlers, ToolName};

/// Tool-call rounds allowed before the model must answer with text.
const MAX_TOOL_ROUNDS: u32 = 5;

#[derive(Clone)]
pub struct LlmResponder {
    client: LlmClient,
    persona_name: String,
    fallback: FallbackResponder,
}

impl LlmResponder {
    pub fn new(client: LlmClient, persona_name: impl Into<String>) -> Self {
        let persona_name = persona_name.into();
        Self {
            client,
            fallback: FallbackResponder::new(persona_name.clone()),
            persona_name,
        }
    }

    pub async fn respond(
        &self,
        conversation: &Conversation,
        knowledge: &KnowledgeStore,
        tools: &ToolHandlers,
    ) -> Reply {
        let mut tools_invoked = Vec::new();
        match self
            .try_respond(conversation, knowledge, tools, &mut tools_invoked)
            .await
        {
            Ok(text) => Reply {
                text,
                tools_invoked,
                source: ReplySource::Llm,
            },
            Err(e) => {
                warn!("LLM responder failed, answering with fallback: {e}");
                self.fallback
                    .respond_after(conversation, knowledge, tools, &tools_invoked)
                    .await
            }
        }
    }

    async fn try_respond(
        &self,
        conversation: &Conversation,
        knowledge: &KnowledgeStore,
        tools: &ToolHandlers,
        tools_invoked: &mut Vec<ToolName>,
    ) -> Result<String, LlmError> {
        let system = Content::system(system_prompt(&self.persona_name, knowledge));
        let declarations = vec![ToolSet {
            function_declarations: tools::declarations(),
        }];
        let mut contents: Vec<Content> = conversation
            .messages()
            .iter()
            .map(|m| match m.role() {
                Role::User => Content::user(m.text()),
                Role::Assistant => Content::model(m.text()),
            })
            .collect();

        for _ in 0..=MAX_TOOL_ROUNDS {
            let request = GenerateRequest {
                system_instruction: Some(system.clone()),
                contents: contents.clone(),
                tools: declarations.clone(),
                ..Default::default()
            };
            let response = self.client.generate(&request).await?;

            let calls = response.function_calls();
            if calls.is_empty() {
                return response.text().ok_or_else(|| {
                    warn!(
                        "LLM returned no text (finish reason: {})",
                        response.finish_reason().unwrap_or("none")
                    );
                    LlmError::EmptyContent
                });
            }

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                let ack = match ToolCall::parse(&call.name, &call.args) {
                    Ok(tool_call) => {
                        info!("LLM invoked tool {}", call.name);
                        tools_invoked.push(tool_call.name());
                        tools.dispatch(&tool_call).await
                    }
                    Err(e) => {
                        warn!("Rejected tool call from LLM: {e}");
                        ToolAck::error(e.to_string())
                    }
                };
                results.push(Part::function_response(call.name.clone(), json!({ "result": ack })));
            }

            let mut model_turn = response.content().cloned().ok_or(LlmError::EmptyContent)?;
            model_turn.role = Some("model".to_string());
            contents.push(model_turn);
            contents.push(Content::function_responses(results));
        }

        Err(LlmError::ToolLoop(MAX_TOOL_ROUNDS))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::knowledge::{KnowledgeDocument, CV};
    use crate::llm_client::testing::{error_reply, function_call_reply, text_reply, FakeGemini};
    use crate::notifier::testing::RecordingNotifier;
    use crate::tools::{CONTACT_TITLE, QUESTION_TITLE};

    fn knowledge() -> KnowledgeStore {
        KnowledgeStore::new(vec![KnowledgeDocument::new(
            CV,
            "Experience\nPrincipal Engineer at Hooli\n",
        )])
    }

    async fn setup(fake: &FakeGemini) -> (LlmResponder, ToolHandlers, Arc<RecordingNotifier>) {
        let base = fake.clone().spawn().await;
        let client = LlmClient::new("key".to_string()).with_base_url(base);
        let notifier = Arc::new(RecordingNotifier::default());
        (
            LlmResponder::new(client, "Jane Doe"),
            ToolHandlers::new(notifier.clone()),
            notifier,
        )
    }

    fn conversation(text: &str) -> Conversation {
        let mut conversation = Conversation::new();
        conversation.push_user(text).unwrap();
        conversation
    }

    #[tokio::test]
    async fn test_plain_text_reply() {
        let fake = FakeGemini::new(vec![text_reply("Jane has 10 years of experience.")]);
        let (responder, tools, _) = setup(&fake).await;

        let reply = responder
            .respond(&conversation("experience?"), &knowledge(), &tools)
            .await;

        assert_eq!(reply.text, "Jane has 10 years of experience.");
        assert_eq!(reply.source, ReplySource::Llm);
        let requests = fake.requests.lock().unwrap();
        let sent = &requests[0];
        assert_eq!(sent["contents"][0]["role"], "user");
        assert_eq!(sent["contents"][0]["parts"][0]["text"], "experience?");
        assert_eq!(
            sent["tools"][0]["functionDeclarations"][0]["name"],
            "record_user_details"
        );
        assert!(sent["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Principal Engineer at Hooli"));
    }

    #[tokio::test]
    async fn test_function_call_runs_tool_and_returns_final_text() {
        let fake = FakeGemini::new(vec![
            function_call_reply(&[(
                "record_user_details",
                json!({"email": "ceo@startup.io", "name": "Pat"}),
            )]),
            text_reply("Thanks Pat, Jane will be in touch."),
        ]);
        let (responder, tools, notifier) = setup(&fake).await;

        let reply = responder
            .respond(&conversation("I'm Pat, ceo@startup.io"), &knowledge(), &tools)
            .await;

        assert_eq!(reply.text, "Thanks Pat, Jane will be in touch.");
        assert_eq!(reply.tools_invoked, vec![ToolName::RecordUserDetails]);
        assert_eq!(notifier.titles(), vec![CONTACT_TITLE]);

        let requests = fake.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let followup = &requests[1]["contents"];
        assert_eq!(followup[1]["role"], "model");
        assert_eq!(followup[1]["parts"][0]["functionCall"]["name"], "record_user_details");
        assert_eq!(
            followup[2]["parts"][0]["functionResponse"]["response"]["result"]["status"],
            "success"
        );
    }

    #[tokio::test]
    async fn test_unknown_function_is_answered_with_error_ack() {
        let fake = FakeGemini::new(vec![
            function_call_reply(&[("send_money", json!({"amount": 100}))]),
            text_reply("Sorry, I can't do that."),
        ]);
        let (responder, tools, notifier) = setup(&fake).await;

        let reply = responder
            .respond(&conversation("pay me"), &knowledge(), &tools)
            .await;

        assert_eq!(reply.text, "Sorry, I can't do that.");
        assert!(reply.tools_invoked.is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
        let requests = fake.requests.lock().unwrap();
        let result = &requests[1]["contents"][2]["parts"][0]["functionResponse"]["response"]["result"];
        assert_eq!(result["status"], "error");
        assert_eq!(result["message"], "Unknown function: send_money");
    }

    #[tokio::test]
    async fn test_api_failure_matches_fallback_reply() {
        let fake = FakeGemini::new(vec![error_reply(StatusCode::FORBIDDEN, "denied")]);
        let (responder, tools, _) = setup(&fake).await;
        let fallback = FallbackResponder::new("Jane Doe");
        let conversation = conversation("What experience do you have?");

        let reply = responder.respond(&conversation, &knowledge(), &tools).await;
        let expected = fallback.respond(&conversation, &knowledge(), &tools).await;

        assert!(!reply.text.is_empty());
        assert_eq!(reply.text, expected.text);
        assert_eq!(reply.source, ReplySource::Fallback);
    }

    #[tokio::test]
    async fn test_failure_after_tool_call_does_not_repeat_it() {
        let fake = FakeGemini::new(vec![
            function_call_reply(&[(
                "record_user_details",
                json!({"email": "pat@startup.io", "name": "Pat"}),
            )]),
            error_reply(StatusCode::BAD_REQUEST, "bad request"),
        ]);
        let (responder, tools, notifier) = setup(&fake).await;
        let conversation = conversation("I'm Pat, pat@startup.io");

        let reply = responder.respond(&conversation, &knowledge(), &tools).await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.tools_invoked, vec![ToolName::RecordUserDetails]);
        assert_eq!(notifier.titles(), vec![CONTACT_TITLE]);
        let expected = FallbackResponder::new("Jane Doe")
            .reply_to("I'm Pat, pat@startup.io", &knowledge(), &tools)
            .await;
        assert_eq!(reply.text, expected.text);
    }

    #[tokio::test]
    async fn test_failure_after_tool_call_logs_no_extra_question() {
        let fake = FakeGemini::new(vec![
            function_call_reply(&[(
                "record_unknown_question",
                json!({"question": "Do you like jazz?"}),
            )]),
            error_reply(StatusCode::BAD_REQUEST, "bad request"),
        ]);
        let (responder, tools, notifier) = setup(&fake).await;

        let reply = responder
            .respond(&conversation("Do you like jazz?"), &knowledge(), &tools)
            .await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(notifier.titles(), vec![QUESTION_TITLE]);
    }

    #[tokio::test]
    async fn test_endless_tool_calls_fall_back() {
        let fake = FakeGemini::new(vec![function_call_reply(&[(
            "record_unknown_question",
            json!({"question": "loop?"}),
        )])]);
        let (responder, tools, _) = setup(&fake).await;

        let reply = responder
            .respond(&conversation("skills?"), &knowledge(), &tools)
            .await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(fake.request_count(), MAX_TOOL_ROUNDS as usize + 1);
    }

    #[tokio::test]
    async fn test_empty_candidate_falls_back() {
        let fake = FakeGemini::new(vec![(StatusCode::OK, json!({ "candidates": [] }))]);
        let (responder, tools, _) = setup(&fake).await;

        let reply = responder
            .respond(&conversation("experience?"), &knowledge(), &tools)
            .await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(reply.text.contains("Principal Engineer at Hooli"));
    }
}
