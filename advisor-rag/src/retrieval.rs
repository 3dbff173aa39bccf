//! Keyword-overlap retrieval.
//!
//! Chunks are ranked by the weighted fraction of query tokens they contain.
//! The default threshold is intentionally low: marginal paragraphs still reach
//! the answerer, which is instructed to decline when the context is thin.

use std::collections::BTreeSet;

use tracing::debug;

use crate::corpus::Corpus;
use crate::document::{DocumentChunk, ScoredChunk};
use crate::tokenizer::{token_weight, tokenize};

/// Default number of chunks returned by [`retrieve_top_k`].
pub const DEFAULT_TOP_K: usize = 5;

/// Default minimum score for a chunk to be returned.
pub const DEFAULT_THRESHOLD: f32 = 0.05;

/// Weighted share of `query` tokens present in `keywords`, in `[0, 1]`.
///
/// Each matched token contributes [`token_weight`]; the sum is divided by the
/// total weight of all query tokens. Returns `0.0` if either set is empty.
pub fn keyword_score(query: &BTreeSet<String>, keywords: &BTreeSet<String>) -> f32 {
    if query.is_empty() || keywords.is_empty() {
        return 0.0;
    }
    let total: usize = query.iter().map(|token| token_weight(token)).sum();
    let matched: usize =
        query.iter().filter(|token| keywords.contains(*token)).map(|token| token_weight(token)).sum();
    matched as f32 / total as f32
}

/// Score every chunk against `query`, keep those at or above `threshold`, and
/// order them by descending score.
///
/// The sort is stable, so equal scores keep the order in which chunks were
/// supplied.
pub fn score_chunks(query: &str, chunks: &[DocumentChunk], threshold: f32) -> Vec<ScoredChunk> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() || chunks.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredChunk> = chunks
        .iter()
        .map(|chunk| ScoredChunk {
            score: keyword_score(&query_tokens, &chunk.keywords),
            chunk: chunk.clone(),
        })
        .filter(|scored| scored.score >= threshold)
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Return at most `k` chunks relevant to `query`, best match first.
///
/// An empty query (after tokenization) or an empty chunk list yields no
/// results.
///
/// # Example
///
/// ```rust
/// use advisor_rag::chunking::chunk_document;
/// use advisor_rag::retrieval::{retrieve_top_k, DEFAULT_THRESHOLD};
///
/// let chunks = chunk_document("proposal", "Proposal", "導入費用的說明如下所示。\n\n專案時程預計為三個月。");
/// let hits = retrieve_top_k("費用", &chunks, 5, DEFAULT_THRESHOLD);
/// assert_eq!(hits[0].paragraph_id, "proposal-p0");
/// ```
pub fn retrieve_top_k(
    query: &str,
    chunks: &[DocumentChunk],
    k: usize,
    threshold: f32,
) -> Vec<DocumentChunk> {
    let scored = score_chunks(query, chunks, threshold);
    debug!(
        query,
        match_count = scored.len(),
        top_score = scored.first().map(|s| s.score).unwrap_or(0.0),
        "retrieval completed"
    );
    scored.into_iter().take(k).map(|scored| scored.chunk).collect()
}

/// Like [`retrieve_top_k`], restricted to the chunks of one document.
pub fn retrieve_top_k_from_document(
    query: &str,
    chunks: &[DocumentChunk],
    document_id: &str,
    k: usize,
) -> Vec<DocumentChunk> {
    let document_chunks: Vec<DocumentChunk> =
        chunks.iter().filter(|chunk| chunk.document_id == document_id).cloned().collect();
    retrieve_top_k(query, &document_chunks, k, DEFAULT_THRESHOLD)
}

/// How the candidate chunks for a question are chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateSelection {
    /// Rank the corpus against the question.
    Ranked,
    /// Use exactly these chunks, bypassing ranking.
    Explicit(Vec<DocumentChunk>),
}

/// Picks a fixed overview subset of the corpus for a guided tour.
///
/// Keeps, in corpus order, the opening paragraphs of each document and any
/// paragraph mentioning one of the focus terms, up to `limit` chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct TourSelection {
    /// Paragraphs with an index below this are always included.
    pub intro_paragraphs: usize,
    /// Substrings that mark a paragraph as essential.
    pub focus_terms: Vec<String>,
    /// Maximum number of chunks selected.
    pub limit: usize,
}

impl Default for TourSelection {
    fn default() -> Self {
        Self {
            intro_paragraphs: 3,
            focus_terms: vec!["方案".to_string(), "導入".to_string(), "費用".to_string()],
            limit: 20,
        }
    }
}

impl TourSelection {
    /// Select the tour chunks from `corpus`.
    pub fn select(&self, corpus: &Corpus) -> CandidateSelection {
        let chunks = corpus
            .chunks()
            .iter()
            .filter(|chunk| {
                chunk.paragraph_index < self.intro_paragraphs
                    || self.focus_terms.iter().any(|term| chunk.content.contains(term.as_str()))
            })
            .take(self.limit)
            .cloned()
            .collect();
        CandidateSelection::Explicit(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::chunk_document;
    use crate::document::SourceDocument;

    fn chunks() -> Vec<DocumentChunk> {
        chunk_document(
            "doc",
            "Doc",
            "專案的維護費用每月計算。\n\n導入時程為三個月完成。\n\nGovernance committee meets monthly.",
        )
    }

    fn tokens(text: &str) -> BTreeSet<String> {
        tokenize(text)
    }

    #[test]
    fn matching_chunk_ranks_first() {
        let results = retrieve_top_k("費用", &chunks(), DEFAULT_TOP_K, DEFAULT_THRESHOLD);
        assert_eq!(results[0].paragraph_id, "doc-p0");

        let scored = score_chunks("費用", &chunks(), DEFAULT_THRESHOLD);
        assert!(scored[0].score > 0.0);
    }

    #[test]
    fn empty_query_returns_nothing() {
        assert!(retrieve_top_k("", &chunks(), 5, DEFAULT_THRESHOLD).is_empty());
        assert!(retrieve_top_k("?!。", &chunks(), 5, DEFAULT_THRESHOLD).is_empty());
        assert!(retrieve_top_k("費用", &[], 5, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn score_weights_words_over_characters() {
        let keywords = tokens("費用");
        // "費用" (2) + "費" (1) + "用" (1) all match.
        assert_eq!(keyword_score(&tokens("費用"), &keywords), 1.0);
        // Query tokens: "費" (1) matches, "x9" (2) does not.
        let score = keyword_score(&tokens("費 x9"), &keywords);
        assert!((score - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn empty_sets_score_zero() {
        assert_eq!(keyword_score(&BTreeSet::new(), &tokens("abc")), 0.0);
        assert_eq!(keyword_score(&tokens("abc"), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn ties_keep_supply_order() {
        let chunks = chunk_document(
            "doc",
            "Doc",
            "budget review alpha text\n\nbudget review beta text\n\nbudget review gamma text",
        );
        let results = retrieve_top_k("budget", &chunks, 5, DEFAULT_THRESHOLD);
        let ids: Vec<&str> = results.iter().map(|c| c.paragraph_id.as_str()).collect();
        assert_eq!(ids, ["doc-p0", "doc-p1", "doc-p2"]);
    }

    #[test]
    fn results_are_bounded_by_k() {
        let chunks = chunk_document(
            "doc",
            "Doc",
            "budget review alpha text\n\nbudget review beta text\n\nbudget review gamma text",
        );
        assert_eq!(retrieve_top_k("budget", &chunks, 2, DEFAULT_THRESHOLD).len(), 2);
        assert!(retrieve_top_k("budget", &chunks, 0, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn threshold_filters_weak_matches() {
        // "governance committee schedule" matches 2 of 3 words in the last chunk.
        let weak = retrieve_top_k("governance committee schedule", &chunks(), 5, 0.7);
        assert!(weak.is_empty());
        let strong = retrieve_top_k("governance committee schedule", &chunks(), 5, 0.6);
        assert_eq!(strong.len(), 1);
    }

    #[test]
    fn score_equal_to_threshold_is_kept() {
        // Twenty single-character tokens, one of which matches: 1/20 == 0.05.
        let query = "甲 子 丑 寅 卯 辰 巳 午 未 申 酉 戌 亥 一 二 三 四 五 六 七";
        let chunks = chunk_document("d", "D", "甲方負責專案的整體規劃。");

        let scored = score_chunks(query, &chunks, DEFAULT_THRESHOLD);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].score, DEFAULT_THRESHOLD);
        assert_eq!(retrieve_top_k(query, &chunks, 5, DEFAULT_THRESHOLD).len(), 1);

        assert!(retrieve_top_k(query, &chunks, 5, 0.051).is_empty());
    }

    #[test]
    fn document_restricted_retrieval() {
        let mut all = chunk_document("a", "A", "maintenance budget overview");
        all.extend(chunk_document("b", "B", "maintenance budget details"));
        let results = retrieve_top_k_from_document("budget", &all, "b", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document_id, "b");
    }

    #[test]
    fn tour_selects_intro_and_focus_paragraphs() {
        let text = "First intro paragraph text.\n\nSecond intro paragraph text.\n\nThird intro paragraph text.\n\nUnrelated closing paragraph.\n\n三種導入方案的比較說明。";
        let corpus = Corpus::build(&[SourceDocument::new("p", "Proposal", text)]);

        let CandidateSelection::Explicit(selected) = TourSelection::default().select(&corpus)
        else {
            panic!("tour selection must be explicit");
        };
        let ids: Vec<&str> = selected.iter().map(|c| c.paragraph_id.as_str()).collect();
        assert_eq!(ids, ["p-p0", "p-p1", "p-p2", "p-p4"]);

        let capped = TourSelection { limit: 2, ..TourSelection::default() }.select(&corpus);
        assert!(matches!(capped, CandidateSelection::Explicit(ref c) if c.len() == 2));
    }
}
