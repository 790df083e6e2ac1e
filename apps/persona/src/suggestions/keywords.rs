//! Keyword-template follow-up suggestions. Deterministic, no LLM call.
//!
//! 1. Pull up to `max` keywords from the user's message (else the reply):
//!    words of 4+ letters, lowercased, stopwords and email addresses removed,
//!    ranked by frequency then alphabetically.
//! 2. Each keyword becomes "Can you tell me more about {keyword}?".
//! 3. Pad to `max` with follow-ups for the detected topic, or generic ones.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::knowledge::Topic;
use crate::responder::contact::strip_emails;
use crate::suggestions::Exchange;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "about", "have", "your", "you", "are",
    "was", "but", "not", "can", "will", "they", "their", "what", "when", "where", "which",
    "tell", "more", "does", "would", "could", "should", "there", "been", "some", "them", "into",
    "were", "then", "than", "also", "just", "like", "please", "know", "here", "much", "many",
];

const GENERIC_FOLLOW_UPS: [&str; 3] = [
    "How did you achieve that?",
    "What tools or technologies were used?",
    "Can you share a brief example or outcome?",
];

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[a-zA-Z]{4,}\b").expect("Invalid word regex"))
}

pub fn extract_keywords(text: &str, top_n: usize) -> Vec<String> {
    let text = strip_emails(text);
    let mut freq: HashMap<String, usize> = HashMap::new();
    for word in word_regex().find_iter(&text) {
        let word = word.as_str().to_lowercase();
        if STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        *freq.entry(word).or_insert(0) += 1;
    }

    let mut items: Vec<(String, usize)> = freq.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items.into_iter().take(top_n).map(|(w, _)| w).collect()
}

fn topic_follow_ups(topic: Option<Topic>) -> [&'static str; 3] {
    match topic {
        Some(Topic::Experience) => [
            "What was your most impactful role?",
            "What technologies did you use day to day?",
            "Which project are you most proud of?",
        ],
        Some(Topic::Skills) => [
            "How did you learn these skills?",
            "Which of these do you use most?",
            "Can you share a project that used them?",
        ],
        Some(Topic::Projects) => [
            "What was the hardest part of that project?",
            "What tools or technologies were used?",
            "What was the outcome?",
        ],
        Some(Topic::Education) => [
            "What did you focus on in your studies?",
            "How has your education shaped your work?",
            "Do you hold any certifications?",
        ],
        Some(Topic::Contact) => [
            "What kind of roles are you open to?",
            "Are you available for a call?",
            "Where are you based?",
        ],
        None => GENERIC_FOLLOW_UPS,
    }
}

pub fn keyword_suggestions(exchange: &Exchange<'_>, max: usize) -> Vec<String> {
    let mut keywords = extract_keywords(exchange.user, max);
    if keywords.is_empty() {
        keywords = extract_keywords(exchange.reply, max);
    }

    let mut suggestions: Vec<String> = keywords
        .into_iter()
        .map(|k| format!("Can you tell me more about {k}?"))
        .take(max)
        .collect();

    let topic = Topic::detect(exchange.user).or_else(|| Topic::detect(exchange.reply));
    for follow_up in topic_follow_ups(topic).into_iter().chain(GENERIC_FOLLOW_UPS) {
        if suggestions.len() >= max {
            break;
        }
        if !suggestions.iter().any(|s| s == follow_up) {
            suggestions.push(follow_up.to_string());
        }
    }

    suggestions
}
