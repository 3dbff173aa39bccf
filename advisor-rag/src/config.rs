//! Configuration for the question-answering pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::retrieval::{DEFAULT_THRESHOLD, DEFAULT_TOP_K};

/// Fixed user-facing messages returned on the non-answer paths.
///
/// These never contain internal error details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResponseMessages {
    /// Returned when the question is blank.
    pub empty_question: String,
    /// Returned when no paragraph clears the relevance threshold.
    pub no_evidence: String,
    /// Returned when the answerer rejects its credentials.
    pub unauthorized: String,
    /// Returned when the answerer's quota or rate limit is exhausted.
    pub rate_limited: String,
    /// Returned when the answerer is not configured.
    pub misconfigured: String,
    /// Returned for any other answerer failure.
    pub generic_failure: String,
}

impl Default for ResponseMessages {
    fn default() -> Self {
        Self {
            empty_question: "請輸入問題。".to_string(),
            no_evidence: "文件中未找到可支持的內容。".to_string(),
            unauthorized: "API 金鑰無效，請聯絡管理員。".to_string(),
            rate_limited: "API 請求額度已用盡，請稍後再試。".to_string(),
            misconfigured: "系統設定錯誤，請稍後再試。".to_string(),
            generic_failure: "系統錯誤，請稍後再試。".to_string(),
        }
    }
}

/// Configuration parameters for [`QaPipeline`](crate::pipeline::QaPipeline).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QaConfig {
    /// Maximum number of ranked chunks offered to the answerer.
    pub top_k: usize,
    /// Minimum keyword-overlap score for a chunk to be offered.
    pub threshold: f32,
    /// Fixed messages for the non-answer paths.
    pub messages: ResponseMessages,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K, threshold: DEFAULT_THRESHOLD, messages: ResponseMessages::default() }
    }
}

impl QaConfig {
    /// Create a new builder for constructing a [`QaConfig`].
    pub fn builder() -> QaConfigBuilder {
        QaConfigBuilder::default()
    }

    /// Parse and validate a configuration from JSON. Missing fields take
    /// their default values.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::ConfigError`] if the JSON is malformed or the
    /// values fail validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: QaConfig = serde_json::from_str(json)
            .map_err(|e| AdvisorError::ConfigError(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::ConfigError`] if:
    /// - `top_k == 0`
    /// - `threshold` is not within `[0, 1]` (NaN included)
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(AdvisorError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AdvisorError::ConfigError(format!(
                "threshold ({}) must be within [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`QaConfig`].
#[derive(Debug, Clone, Default)]
pub struct QaConfigBuilder {
    config: QaConfig,
}

impl QaConfigBuilder {
    /// Set the number of ranked chunks offered to the answerer.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum relevance score.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Replace the fixed response messages.
    pub fn messages(mut self, messages: ResponseMessages) -> Self {
        self.config.messages = messages;
        self
    }

    /// Build the [`QaConfig`], validating its parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::ConfigError`] if [`QaConfig::validate`] fails.
    pub fn build(self) -> Result<QaConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_retrieval_defaults() {
        let config = QaConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.threshold, 0.05);
        assert_eq!(config.messages.no_evidence, "文件中未找到可支持的內容。");
    }

    #[test]
    fn builder_validates() {
        assert!(QaConfig::builder().top_k(3).threshold(0.2).build().is_ok());
        assert!(matches!(
            QaConfig::builder().top_k(0).build(),
            Err(AdvisorError::ConfigError(_))
        ));
        assert!(QaConfig::builder().threshold(1.5).build().is_err());
        assert!(QaConfig::builder().threshold(f32::NAN).build().is_err());
    }

    #[test]
    fn hand_built_config_is_validated() {
        let config = QaConfig { top_k: 0, ..QaConfig::default() };
        assert!(matches!(config.validate(), Err(AdvisorError::ConfigError(_))));
        assert!(QaConfig::default().validate().is_ok());
    }

    #[test]
    fn json_fills_defaults() {
        let config = QaConfig::from_json(r#"{"top_k": 8, "messages": {"no_evidence": "none"}}"#)
            .expect("valid config");
        assert_eq!(config.top_k, 8);
        assert_eq!(config.threshold, 0.05);
        assert_eq!(config.messages.no_evidence, "none");
        assert_eq!(config.messages.empty_question, "請輸入問題。");
    }

    #[test]
    fn json_is_validated() {
        assert!(QaConfig::from_json(r#"{"top_k": 0}"#).is_err());
        assert!(QaConfig::from_json("not json").is_err());
    }
}
