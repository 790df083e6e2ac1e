use crate::knowledge::{KnowledgeStore, CV, LINKEDIN, SUMMARY};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;

/// Builds the system instruction for the LLM responder, embedding every
/// knowledge document (missing ones rendered as "Not available.").
pub fn system_prompt(persona_name: &str, knowledge: &KnowledgeStore) -> String {
    format!(
        "You are a helpful AI assistant representing {name}. Your goal is to answer questions \
         about {name} professionally and accurately. Use the provided summary, CV, and LinkedIn \
         information to respond to users.\n\n\
         ## Summary:\n{summary}\n\n\
         ## LinkedIn Profile:\n{linkedin}\n\n\
         ## CV / Resume:\n{cv}\n\n\
         Your instructions are:\n\
         1. Be friendly, professional, and concise.\n\
         2. If you are unsure of an answer or the information is not in your context, you MUST \
         use the `record_unknown_question` tool to log the question.\n\
         3. Actively encourage users who seem interested in hiring or connecting to provide \
         their name and email. Use the `record_user_details` tool to save their information.\n\
         4. {grounding}",
        name = persona_name,
        summary = knowledge.text_or_placeholder(SUMMARY),
        linkedin = knowledge.text_or_placeholder(LINKEDIN),
        cv = knowledge.text_or_placeholder(CV),
        grounding = GROUNDING_INSTRUCTION,
    )
}
