//! Data types for documents, paragraph chunks, citations and responses.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A source document as supplied by the external document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDocument {
    /// Stable, externally assigned identifier.
    pub id: String,
    /// Display name of the document.
    pub title: String,
    /// Raw Markdown text with `\n` line breaks.
    pub content: String,
}

impl SourceDocument {
    /// Create a new source document.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), title: title.into(), content: content.into() }
    }
}

/// One retrievable paragraph of a [`SourceDocument`].
///
/// `paragraph_id` is always `{document_id}-p{paragraph_index}` and is the key
/// used by citations and deep links.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunk {
    /// The ID of the owning document.
    pub document_id: String,
    /// Display name of the owning document.
    pub document_title: String,
    /// Corpus-wide stable paragraph identifier.
    pub paragraph_id: String,
    /// Zero-based position within the owning document.
    pub paragraph_index: usize,
    /// Nearest preceding heading, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    /// Trimmed paragraph text.
    pub content: String,
    /// Keyword tokens derived from `content`.
    pub keywords: BTreeSet<String>,
}

/// A [`DocumentChunk`] paired with its keyword-overlap score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// The scored chunk.
    pub chunk: DocumentChunk,
    /// Relevance in `[0, 1]`.
    pub score: f32,
}

/// A reference from an answer to a specific paragraph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// The cited paragraph.
    pub paragraph_id: String,
    /// Free-text justification for why the paragraph supports the answer.
    #[serde(default)]
    pub relevance: String,
}

impl Citation {
    /// Create a new citation.
    pub fn new(paragraph_id: impl Into<String>, relevance: impl Into<String>) -> Self {
        Self { paragraph_id: paragraph_id.into(), relevance: relevance.into() }
    }
}

/// Speaker of a conversation history entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

/// A single turn of conversation history, passed through to the answerer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// A message typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// A message produced by the assistant.
    pub fn ai(content: impl Into<String>) -> Self {
        Self { role: Role::Ai, content: content.into() }
    }
}

/// The answer and validated citations returned to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
}

impl QaResponse {
    /// A response carrying only a fixed message and no citations.
    pub fn message(answer: impl Into<String>) -> Self {
        Self { answer: answer.into(), citations: Vec::new() }
    }
}
