//! Knowledge Store: the candidate's resume material, loaded once at startup.
//!
//! Documents are read from a single directory:
//!   summary.txt   plain text
//!   cv.pdf        text extracted with pdf-extract
//!   linkedin.pdf  text extracted with pdf-extract
//!
//! A missing or unreadable document is logged and skipped. The store is never
//! mutated after `load` returns and is shared as `Arc<KnowledgeStore>`.

pub mod topics;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub use topics::Topic;

pub const SUMMARY: &str = "summary";
pub const CV: &str = "cv";
pub const LINKEDIN: &str = "linkedin";

/// Placeholder used in prompts for documents that were not loaded.
pub const NOT_AVAILABLE: &str = "Not available.";

/// Upper bound on the length of a snippet returned for a topic.
const SNIPPET_LIMIT: usize = 700;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from {path}: {message}")]
    Pdf { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeDocument {
    pub source_name: String,
    pub raw_text: String,
}

impl KnowledgeDocument {
    pub fn new(source_name: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            raw_text: raw_text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    documents: Vec<KnowledgeDocument>,
}

impl KnowledgeStore {
    pub fn new(documents: Vec<KnowledgeDocument>) -> Self {
        Self { documents }
    }

    /// Loads summary.txt, cv.pdf and linkedin.pdf from `dir`.
    pub fn load(dir: &Path) -> Self {
        let sources: [(&str, PathBuf, fn(&Path) -> Result<String, KnowledgeError>); 3] = [
            (SUMMARY, dir.join("summary.txt"), read_text_document),
            (CV, dir.join("cv.pdf"), read_pdf_document),
            (LINKEDIN, dir.join("linkedin.pdf"), read_pdf_document),
        ];

        let mut documents = Vec::new();
        for (name, path, read) in sources {
            match read(&path) {
                Ok(text) if text.trim().is_empty() => {
                    warn!("Knowledge document '{name}' at {} is empty, skipping", path.display());
                }
                Ok(text) => {
                    info!("Loaded knowledge document '{name}' ({} chars)", text.len());
                    documents.push(KnowledgeDocument::new(name, text));
                }
                Err(e) => warn!("Skipping knowledge document '{name}': {e}"),
            }
        }

        Self::new(documents)
    }

    pub fn documents(&self) -> &[KnowledgeDocument] {
        &self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn document(&self, source_name: &str) -> Option<&KnowledgeDocument> {
        self.documents.iter().find(|d| d.source_name == source_name)
    }

    /// Document text for prompt embedding, or the placeholder when missing.
    pub fn text_or_placeholder(&self, source_name: &str) -> &str {
        self.document(source_name)
            .map(|d| d.raw_text.as_str())
            .unwrap_or(NOT_AVAILABLE)
    }

    /// Extracts text about `topic` from the loaded documents.
    ///
    /// Prefers a heading-delimited section (first document that has one);
    /// otherwise gathers paragraphs that mention one of the topic's keywords.
    pub fn snippet_for(&self, topic: Topic) -> Option<String> {
        self.documents
            .iter()
            .find_map(|d| section_under_heading(&d.raw_text, topic))
            .or_else(|| self.paragraphs_mentioning(topic))
    }

    fn paragraphs_mentioning(&self, topic: Topic) -> Option<String> {
        let mut picked: Vec<&str> = Vec::new();
        let mut used = 0;
        for doc in &self.documents {
            for paragraph in paragraphs(&doc.raw_text) {
                let lower = paragraph.to_lowercase();
                if !topic.keywords().iter().any(|kw| lower.contains(kw)) {
                    continue;
                }
                if used + paragraph.len() > SNIPPET_LIMIT && !picked.is_empty() {
                    return Some(picked.join("\n\n"));
                }
                used += paragraph.len();
                picked.push(paragraph);
            }
        }
        if picked.is_empty() {
            None
        } else {
            Some(truncate_chars(&picked.join("\n\n"), SNIPPET_LIMIT))
        }
    }
}

fn read_text_document(path: &Path) -> Result<String, KnowledgeError> {
    if !path.exists() {
        return Err(KnowledgeError::NotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_pdf_document(path: &Path) -> Result<String, KnowledgeError> {
    if !path.exists() {
        return Err(KnowledgeError::NotFound(path.to_path_buf()));
    }
    // pdf-extract panics on some malformed content streams
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text(path));
    match extracted {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(KnowledgeError::Pdf {
            path: path.to_path_buf(),
            message: format!("{e:?}"),
        }),
        Err(_) => Err(KnowledgeError::Pdf {
            path: path.to_path_buf(),
            message: "extractor panicked".to_string(),
        }),
    }
}

/// Returns the non-blank lines following the first heading for `topic`, up to
/// the next heading of any kind.
fn section_under_heading(text: &str, topic: Topic) -> Option<String> {
    let mut lines = text.lines();
    lines.find(|line| Topic::from_heading(line) == Some(topic))?;

    let mut body: Vec<&str> = Vec::new();
    let mut used = 0;
    for line in lines {
        if topics::is_heading(line) {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if used + line.len() > SNIPPET_LIMIT && !body.is_empty() {
            break;
        }
        used += line.len() + 1;
        body.push(line);
    }

    if body.is_empty() {
        None
    } else {
        Some(truncate_chars(&body.join("\n"), SNIPPET_LIMIT))
    }
}

fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{}…", cut.trim_end())
}
