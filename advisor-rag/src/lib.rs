//! # advisor-rag
//!
//! Paragraph-level retrieval and citation-checked question answering over a
//! small, fixed corpus of Markdown documents.
//!
//! The crate covers the retrieval core of a document advisor:
//!
//! - [`tokenizer`]: mixed Latin/CJK keyword extraction
//! - [`chunking`]: stable `{document_id}-p{index}` paragraph chunks with section titles
//! - [`retrieval`]: keyword-overlap scoring and top-K selection
//! - [`citation`]: filtering answerer citations to the offered paragraphs
//! - [`pipeline`]: the [`QaPipeline`] orchestrator
//!
//! The language model sits behind the [`Answerer`] trait. Enable the `openai`
//! feature for an implementation backed by the OpenAI chat completions API.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use advisor_rag::{CandidateSelection, Corpus, QaPipeline, SourceDocument};
//!
//! let corpus = Corpus::build(&[SourceDocument::new("charter", "專案章程", charter_text)]);
//! let pipeline = QaPipeline::builder().answerer(Arc::new(my_answerer)).build()?;
//!
//! let outcome = pipeline.ask("專案範圍是什麼？", &corpus, CandidateSelection::Ranked, vec![]).await;
//! for citation in &outcome.response.citations {
//!     println!("{}: {}", citation.paragraph_id, citation.relevance);
//! }
//! ```

pub mod answerer;
pub mod chunking;
pub mod citation;
pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod tokenizer;

#[cfg(feature = "openai")]
pub mod openai;

pub use answerer::{AnswerError, AnswerRequest, Answerer, RawAnswer, parse_raw_answer};
pub use chunking::{Chunker, MIN_PARAGRAPH_CHARS, ParagraphChunker, chunk_document};
pub use citation::validate_citations;
pub use config::{QaConfig, QaConfigBuilder, ResponseMessages};
pub use corpus::Corpus;
pub use document::{
    ChatMessage, Citation, DocumentChunk, QaResponse, Role, ScoredChunk, SourceDocument,
};
pub use error::{AdvisorError, Result};
pub use pipeline::{FailureKind, QaOutcome, QaPipeline, QaPipelineBuilder, QaState};
pub use retrieval::{
    CandidateSelection, DEFAULT_THRESHOLD, DEFAULT_TOP_K, TourSelection, retrieve_top_k,
};
pub use tokenizer::tokenize;

#[cfg(feature = "openai")]
pub use openai::OpenAIAnswerer;
