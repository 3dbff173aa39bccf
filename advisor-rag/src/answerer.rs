//! The answering collaborator seam.
//!
//! An [`Answerer`] receives the question, the candidate paragraphs and the
//! conversation history, and returns an answer with the paragraph IDs it
//! relied on. The citations it returns are untrusted; the pipeline validates
//! them against the paragraphs it actually offered.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{ChatMessage, Citation, DocumentChunk};

/// Errors an [`Answerer`] can report.
///
/// The pipeline maps each of these to a fixed user-facing message; the
/// details are only logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerError {
    /// The credential was rejected.
    #[error("answerer rejected the credential")]
    Unauthorized,

    /// The rate limit or quota is exhausted.
    #[error("answerer rate limit or quota exhausted")]
    RateLimited,

    /// The answerer is missing required configuration.
    #[error("answerer misconfigured: {0}")]
    Misconfigured(String),

    /// The request could not be completed.
    #[error("answerer transport error: {0}")]
    Transport(String),

    /// The response could not be parsed.
    #[error("answerer returned an unparseable response: {0}")]
    Parse(String),
}

/// Everything the answerer gets to see for one question.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnswerRequest {
    pub question: String,
    /// Candidate paragraphs, best first.
    pub chunks: Vec<DocumentChunk>,
    /// Conversation so far, oldest first.
    pub history: Vec<ChatMessage>,
}

/// The answerer's unvalidated output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawAnswer {
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Produces an answer for a question from a set of candidate paragraphs.
///
/// # Example
///
/// ```rust,ignore
/// use advisor_rag::answerer::{AnswerError, AnswerRequest, Answerer, RawAnswer};
///
/// struct Echo;
///
/// #[async_trait::async_trait]
/// impl Answerer for Echo {
///     async fn answer(&self, request: AnswerRequest) -> Result<RawAnswer, AnswerError> {
///         Ok(RawAnswer { answer: request.question, citations: Vec::new() })
///     }
/// }
/// ```
#[async_trait]
pub trait Answerer: Send + Sync {
    /// Answer `request.question` using only `request.chunks`.
    async fn answer(&self, request: AnswerRequest) -> Result<RawAnswer, AnswerError>;
}

/// Parse the JSON body an answerer is instructed to produce:
/// `{"answer": "...", "citations": [{"paragraphId": "...", "relevance": "..."}]}`.
///
/// # Errors
///
/// Returns [`AnswerError::Parse`] if the text is not valid JSON of that shape.
pub fn parse_raw_answer(body: &str) -> Result<RawAnswer, AnswerError> {
    serde_json::from_str(body).map_err(|e| AnswerError::Parse(e.to_string()))
}
