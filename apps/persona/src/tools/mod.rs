//! Tool Handlers: the two side-effecting actions a responder may invoke.
//!
//! The set of tools is closed: `ToolName` is the lookup table from a function
//! name (as declared to the LLM) to a `ToolCall` variant, and `ToolHandlers`
//! executes a parsed call. Handlers always acknowledge success; notification
//! delivery is best-effort and never surfaces as a tool failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::notifier::Notifier;

pub const CONTACT_TITLE: &str = "New Contact Recorded";
pub const QUESTION_TITLE: &str = "Unanswered Question Logged";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    RecordUserDetails,
    RecordUnknownQuestion,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::RecordUserDetails, ToolName::RecordUnknownQuestion];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::RecordUserDetails => "record_user_details",
            ToolName::RecordUnknownQuestion => "record_unknown_question",
        }
    }

    pub fn lookup(name: &str) -> Option<ToolName> {
        ToolName::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Contact details a user volunteered. At least one of `email` or `phone`
/// is present on every record built by this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ContactRecord {
    fn has_reachable_detail(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.email) || present(&self.phone)
    }

    /// Body of the Pushover message for this contact.
    pub fn notification_message(&self) -> String {
        let mut message = format!(
            "Name: {}\nEmail: {}",
            self.name.as_deref().unwrap_or("Name not provided"),
            self.email.as_deref().unwrap_or("Not provided"),
        );
        if let Some(phone) = &self.phone {
            message.push_str(&format!("\nPhone: {phone}"));
        }
        message.push_str(&format!(
            "\nNotes: {}",
            self.notes.as_deref().unwrap_or("Not provided")
        ));
        message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnansweredQuestion {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    RecordUserDetails(ContactRecord),
    RecordUnknownQuestion(UnansweredQuestion),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Invalid arguments for {name}: {message}")]
    InvalidArguments { name: &'static str, message: String },
}

impl ToolCall {
    /// Builds a call from a function name and its JSON arguments.
    pub fn parse(name: &str, args: &Value) -> Result<ToolCall, ToolError> {
        let tool = ToolName::lookup(name).ok_or_else(|| ToolError::UnknownFunction(name.to_string()))?;
        let invalid = |message: String| ToolError::InvalidArguments {
            name: tool.as_str(),
            message,
        };

        match tool {
            ToolName::RecordUserDetails => {
                let contact: ContactRecord =
                    serde_json::from_value(args.clone()).map_err(|e| invalid(e.to_string()))?;
                if !contact.has_reachable_detail() {
                    return Err(invalid("an email or phone number is required".to_string()));
                }
                Ok(ToolCall::RecordUserDetails(contact))
            }
            ToolName::RecordUnknownQuestion => {
                let question: UnansweredQuestion =
                    serde_json::from_value(args.clone()).map_err(|e| invalid(e.to_string()))?;
                Ok(ToolCall::RecordUnknownQuestion(question))
            }
        }
    }

    pub fn name(&self) -> ToolName {
        match self {
            ToolCall::RecordUserDetails(_) => ToolName::RecordUserDetails,
            ToolCall::RecordUnknownQuestion(_) => ToolName::RecordUnknownQuestion,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Success,
    Error,
}

/// Result of a tool invocation, returned to the LLM as a function response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolAck {
    pub status: AckStatus,
    pub message: String,
}

impl ToolAck {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: AckStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: AckStatus::Error,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        self.status == AckStatus::Success
    }
}

#[derive(Clone)]
pub struct ToolHandlers {
    notifier: Arc<dyn Notifier>,
}

impl ToolHandlers {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub async fn record_user_details(&self, contact: &ContactRecord) -> ToolAck {
        let name = contact.name.as_deref().unwrap_or("Name not provided");
        info!(tool = "record_user_details", "Recording contact details for {name}");
        self.notifier
            .notify(CONTACT_TITLE, &contact.notification_message())
            .await;
        ToolAck::success(format!("Details for {name} recorded."))
    }

    pub async fn record_unknown_question(&self, question: &UnansweredQuestion) -> ToolAck {
        info!(tool = "record_unknown_question", "Logging unanswered question");
        self.notifier
            .notify(QUESTION_TITLE, &format!("Question: {}", question.question))
            .await;
        ToolAck::success("Question has been recorded for review.")
    }

    pub async fn dispatch(&self, call: &ToolCall) -> ToolAck {
        match call {
            ToolCall::RecordUserDetails(contact) => self.record_user_details(contact).await,
            ToolCall::RecordUnknownQuestion(question) => {
                self.record_unknown_question(question).await
            }
        }
    }
}

/// Function declarations advertised to Gemini, one per `ToolName`.
pub fn declarations() -> Vec<Value> {
    ToolName::ALL.into_iter().map(declaration).collect()
}

fn declaration(tool: ToolName) -> Value {
    match tool {
        ToolName::RecordUserDetails => json!({
            "name": tool.as_str(),
            "description": "Record that a user wants to get in touch and provided contact details.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "email": { "type": "STRING", "description": "The user's email address" },
                    "phone": { "type": "STRING", "description": "The user's phone number, if given instead of an email" },
                    "name": { "type": "STRING", "description": "The user's name, if provided" },
                    "notes": {
                        "type": "STRING",
                        "description": "Any context about the conversation worth recording"
                    }
                }
            }
        }),
        ToolName::RecordUnknownQuestion => json!({
            "name": tool.as_str(),
            "description": "Record a question that could not be answered from the provided context.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "question": { "type": "STRING", "description": "The question that could not be answered" }
                },
                "required": ["question"]
            }
        }),
    }
}
