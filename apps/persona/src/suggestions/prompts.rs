use crate::suggestions::Exchange;

pub const SUGGESTION_PROMPT_TEMPLATE: &str = r#"A visitor is chatting with an assistant that answers questions about a candidate's resume.

Visitor asked:
{user}

Assistant replied:
{reply}

Suggest 3 short follow-up questions the visitor might ask next, written from the visitor's point of view and addressed to the candidate.
Each question must be under 12 words and answerable from a resume.

Return a JSON array of strings, for example:
["What was your role on that team?", "Which tools did you use?", "What was the outcome?"]"#;

pub fn suggestion_prompt(exchange: &Exchange<'_>) -> String {
    SUGGESTION_PROMPT_TEMPLATE
        .replace("{user}", exchange.user)
        .replace("{reply}", exchange.reply)
}
