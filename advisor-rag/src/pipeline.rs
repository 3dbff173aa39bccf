//! Question-answering orchestrator.
//!
//! The [`QaPipeline`] runs one question through
//! select candidates → answer → validate citations, and always comes back with
//! a well-formed [`QaResponse`]. Failures of the answering collaborator are
//! logged and replaced with fixed messages; they never reach the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use advisor_rag::{CandidateSelection, Corpus, QaConfig, QaPipeline};
//!
//! let pipeline = QaPipeline::builder()
//!     .config(QaConfig::default())
//!     .answerer(Arc::new(my_answerer))
//!     .build()?;
//!
//! let corpus = Corpus::build(&documents);
//! let outcome = pipeline.ask("維護費用是多少？", &corpus, CandidateSelection::Ranked, history).await;
//! println!("{}", outcome.response.answer);
//! ```

use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info};

use crate::answerer::{AnswerError, AnswerRequest, Answerer};
use crate::citation::validate_citations;
use crate::config::{QaConfig, ResponseMessages};
use crate::corpus::Corpus;
use crate::document::{ChatMessage, QaResponse};
use crate::error::{AdvisorError, Result};
use crate::retrieval::{CandidateSelection, retrieve_top_k};

/// Why an answer attempt failed, at the granularity shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The answerer's credential was rejected.
    Auth,
    /// The answerer's quota or rate limit is exhausted.
    RateLimit,
    /// The answerer is not configured.
    Misconfigured,
    /// Transport failure, unparseable response, or anything else.
    Generic,
}

impl From<&AnswerError> for FailureKind {
    fn from(error: &AnswerError) -> Self {
        match error {
            AnswerError::Unauthorized => Self::Auth,
            AnswerError::RateLimited => Self::RateLimit,
            AnswerError::Misconfigured(_) => Self::Misconfigured,
            AnswerError::Transport(_) | AnswerError::Parse(_) => Self::Generic,
        }
    }
}

impl FailureKind {
    /// The fixed user-facing message for this failure.
    pub fn message(self, messages: &ResponseMessages) -> &str {
        match self {
            Self::Auth => &messages.unauthorized,
            Self::RateLimit => &messages.rate_limited,
            Self::Misconfigured => &messages.misconfigured,
            Self::Generic => &messages.generic_failure,
        }
    }
}

/// Terminal state of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QaState {
    /// The question was blank; nothing was retrieved.
    Rejected,
    /// No paragraph qualified; the answerer was not called.
    NoEvidence,
    /// The answerer responded; citations were validated.
    Answered,
    /// The answerer failed.
    Failed(FailureKind),
}

/// The result of [`QaPipeline::ask`]: how the question ended and what to show.
#[derive(Debug, Clone, PartialEq)]
pub struct QaOutcome {
    pub state: QaState,
    pub response: QaResponse,
}

impl QaOutcome {
    fn message(state: QaState, answer: &str) -> Self {
        Self { state, response: QaResponse::message(answer) }
    }

    /// Discard the state and keep the response.
    pub fn into_response(self) -> QaResponse {
        self.response
    }
}

/// The question-answering orchestrator.
///
/// Holds no per-query state, so one pipeline can serve any number of
/// concurrent questions. Construct one via [`QaPipeline::builder()`].
pub struct QaPipeline {
    config: QaConfig,
    answerer: Arc<dyn Answerer>,
}

impl QaPipeline {
    /// Create a new [`QaPipelineBuilder`].
    pub fn builder() -> QaPipelineBuilder {
        QaPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Answer `question` from `corpus`.
    ///
    /// `selection` decides the candidate paragraphs: ranked retrieval over the
    /// corpus, or an explicit list used verbatim. `history` is passed to the
    /// answerer unchanged.
    pub async fn ask(
        &self,
        question: &str,
        corpus: &Corpus,
        selection: CandidateSelection,
        history: Vec<ChatMessage>,
    ) -> QaOutcome {
        let messages = &self.config.messages;

        if question.trim().is_empty() {
            info!("rejected blank question");
            return QaOutcome::message(QaState::Rejected, &messages.empty_question);
        }

        let candidates = match selection {
            CandidateSelection::Explicit(chunks) => chunks,
            CandidateSelection::Ranked => {
                retrieve_top_k(question, corpus.chunks(), self.config.top_k, self.config.threshold)
            }
        };

        if candidates.is_empty() {
            info!(question, "no supporting paragraphs found");
            return QaOutcome::message(QaState::NoEvidence, &messages.no_evidence);
        }

        let request = AnswerRequest { question: question.to_string(), chunks: candidates, history };
        let offered = request.chunks.clone();

        match self.answerer.answer(request).await {
            Ok(raw) => {
                let citations = validate_citations(raw.citations, &offered);
                info!(
                    question,
                    candidate_count = offered.len(),
                    citation_count = citations.len(),
                    "answered question"
                );
                QaOutcome {
                    state: QaState::Answered,
                    response: QaResponse { answer: raw.answer, citations },
                }
            }
            Err(e) => {
                error!(question, error = %e, "answerer failed");
                let kind = FailureKind::from(&e);
                QaOutcome::message(QaState::Failed(kind), kind.message(messages))
            }
        }
    }

    /// Answer several independent questions concurrently with ranked
    /// retrieval and no history. Outcomes are returned in input order.
    pub async fn ask_many(&self, questions: &[&str], corpus: &Corpus) -> Vec<QaOutcome> {
        join_all(
            questions
                .iter()
                .map(|question| self.ask(question, corpus, CandidateSelection::Ranked, Vec::new())),
        )
        .await
    }
}

/// Builder for constructing a [`QaPipeline`].
///
/// The answerer is required; the configuration defaults to
/// [`QaConfig::default()`].
#[derive(Default)]
pub struct QaPipelineBuilder {
    config: Option<QaConfig>,
    answerer: Option<Arc<dyn Answerer>>,
}

impl QaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: QaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the answering collaborator.
    pub fn answerer(mut self, answerer: Arc<dyn Answerer>) -> Self {
        self.answerer = Some(answerer);
        self
    }

    /// Build the [`QaPipeline`].
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::ConfigError`] if no answerer was set or the
    /// configuration fails [`QaConfig::validate`].
    pub fn build(self) -> Result<QaPipeline> {
        let answerer = self
            .answerer
            .ok_or_else(|| AdvisorError::ConfigError("answerer is required".to_string()))?;

        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(QaPipeline { config, answerer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_follow_error_kinds() {
        assert_eq!(FailureKind::from(&AnswerError::Unauthorized), FailureKind::Auth);
        assert_eq!(FailureKind::from(&AnswerError::RateLimited), FailureKind::RateLimit);
        assert_eq!(
            FailureKind::from(&AnswerError::Misconfigured("no key".into())),
            FailureKind::Misconfigured
        );
        assert_eq!(FailureKind::from(&AnswerError::Parse("eof".into())), FailureKind::Generic);
        assert_eq!(FailureKind::from(&AnswerError::Transport("timeout".into())), FailureKind::Generic);
    }

    #[test]
    fn builder_requires_answerer() {
        assert!(matches!(QaPipeline::builder().build(), Err(AdvisorError::ConfigError(_))));
    }
}
