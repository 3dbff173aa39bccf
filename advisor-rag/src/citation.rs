//! Citation validation.
//!
//! The answerer may cite paragraph IDs it was never shown. Only citations that
//! point at one of the offered chunks are kept; everything else is dropped
//! silently, so a fully fabricated citation list degrades to an empty one.

use std::collections::HashSet;

use tracing::warn;

use crate::document::{Citation, DocumentChunk};

/// Keep only citations whose paragraph ID belongs to `offered`.
///
/// Order and relevance text of surviving citations are left untouched.
pub fn validate_citations(citations: Vec<Citation>, offered: &[DocumentChunk]) -> Vec<Citation> {
    let offered_ids: HashSet<&str> = offered.iter().map(|c| c.paragraph_id.as_str()).collect();
    let claimed = citations.len();

    let valid: Vec<Citation> = citations
        .into_iter()
        .filter(|citation| offered_ids.contains(citation.paragraph_id.as_str()))
        .collect();

    let dropped = claimed - valid.len();
    if dropped > 0 {
        warn!(claimed, dropped, "dropped citations outside the offered paragraphs");
    }
    valid
}
