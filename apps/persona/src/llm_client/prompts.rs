// Shared prompt fragments.
// Each component that calls the LLM keeps its own prompts.rs alongside it;
// this file holds the pieces more than one of them uses.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps every answer inside the loaded resume material.
pub const GROUNDING_INSTRUCTION: &str = "Do not make up information. \
    Stick strictly to the provided context.";
