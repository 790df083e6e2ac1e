//! Topics the fallback responder recognizes, with the message keywords and
//! document headings that map to each.

use serde::{Deserialize, Serialize};

/// A resume topic. Variant order is match precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Experience,
    Skills,
    Projects,
    Education,
    Contact,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Experience,
        Topic::Skills,
        Topic::Projects,
        Topic::Education,
        Topic::Contact,
    ];

    /// Lowercase substrings that select this topic in a user message.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Topic::Experience => &["experience", "career", "worked", "job", "employ"],
            Topic::Skills => &[
                "skill",
                "technolog",
                "tech stack",
                "programming",
                "framework",
                "language",
                "tools",
            ],
            Topic::Projects => &["project", "portfolio", "built", "github"],
            Topic::Education => &[
                "education",
                "degree",
                "university",
                "college",
                "school",
                "studied",
            ],
            Topic::Contact => &[
                "contact",
                "reach out",
                "hire",
                "hiring",
                "connect",
                "get in touch",
                "email",
                "phone",
            ],
        }
    }

    /// Section headings (normalized) that open this topic inside a document.
    pub fn headings(self) -> &'static [&'static str] {
        match self {
            Topic::Experience => &[
                "experience",
                "work experience",
                "professional experience",
                "employment",
                "employment history",
                "work history",
                "career history",
            ],
            Topic::Skills => &[
                "skills",
                "top skills",
                "technical skills",
                "core skills",
                "key skills",
                "technologies",
                "tech stack",
                "competencies",
            ],
            Topic::Projects => &[
                "projects",
                "personal projects",
                "key projects",
                "selected projects",
                "side projects",
            ],
            Topic::Education => &[
                "education",
                "academic background",
                "qualifications",
                "education and training",
            ],
            Topic::Contact => &[
                "contact",
                "contact details",
                "contact information",
                "contact info",
            ],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Topic::Experience => "experience",
            Topic::Skills => "skills",
            Topic::Projects => "projects",
            Topic::Education => "education",
            Topic::Contact => "contact details",
        }
    }

    /// Returns the first topic, in precedence order, whose keywords occur in
    /// `text` (case-insensitive).
    pub fn detect(text: &str) -> Option<Topic> {
        let lower = text.to_lowercase();
        Topic::ALL
            .into_iter()
            .find(|topic| topic.keywords().iter().any(|kw| lower.contains(kw)))
    }

    /// Returns the topic whose section `line` opens, if it is a heading.
    pub fn from_heading(line: &str) -> Option<Topic> {
        let normalized = normalize_heading(line)?;
        Topic::ALL
            .into_iter()
            .find(|topic| topic.headings().contains(&normalized.as_str()))
    }
}

/// Headings that close a topic section without opening another one.
const OTHER_HEADINGS: &[&str] = &[
    "summary",
    "about",
    "about me",
    "profile",
    "certifications",
    "licenses and certifications",
    "languages",
    "interests",
    "honors-awards",
    "awards",
    "achievements",
    "publications",
    "references",
    "volunteer experience",
];

/// True when `line` looks like any section heading, topic or not.
pub fn is_heading(line: &str) -> bool {
    match normalize_heading(line) {
        Some(normalized) => {
            OTHER_HEADINGS.contains(&normalized.as_str()) || Topic::from_heading(line).is_some()
        }
        None => false,
    }
}

/// Lowercases a candidate heading line and strips markdown hashes and a
/// trailing colon. Long lines are never headings.
fn normalize_heading(line: &str) -> Option<String> {
    let trimmed = line.trim().trim_start_matches('#').trim().trim_end_matches(':').trim();
    if trimmed.is_empty() || trimmed.len() > 40 {
        return None;
    }
    Some(trimmed.to_lowercase().replace(" & ", " and "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(Topic::detect("What EXPERIENCE do you have?"), Some(Topic::Experience));
    }

    #[test]
    fn test_detect_first_topic_wins() {
        // mentions both experience and skills
        assert_eq!(
            Topic::detect("skills and experience please"),
            Some(Topic::Experience)
        );
    }

    #[test]
    fn test_detect_framework_is_skills_not_experience() {
        assert_eq!(Topic::detect("Which frameworks?"), Some(Topic::Skills));
    }

    #[test]
    fn test_detect_none() {
        assert_eq!(Topic::detect("What is your favourite colour?"), None);
    }

    #[test]
    fn test_from_heading_variants() {
        assert_eq!(Topic::from_heading("## Work Experience:"), Some(Topic::Experience));
        assert_eq!(Topic::from_heading("Top Skills"), Some(Topic::Skills));
        assert_eq!(Topic::from_heading("Education & Training"), Some(Topic::Education));
        assert_eq!(Topic::from_heading("I have a lot of experience"), None);
    }

    #[test]
    fn test_is_heading_includes_non_topic_sections() {
        assert!(is_heading("Certifications"));
        assert!(is_heading("EDUCATION"));
        assert!(!is_heading("Rust, Go, Python"));
    }
}
