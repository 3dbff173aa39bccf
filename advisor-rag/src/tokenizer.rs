//! Keyword tokenizer for mixed Latin/CJK text.
//!
//! Chinese text is indexed one ideograph at a time so that compounds match
//! without a word segmenter, while Latin words are kept whole. Space-delimited
//! CJK runs are additionally kept as phrase tokens, which lets explicitly
//! separated terms in the source text score higher than loose characters.

use std::collections::BTreeSet;

/// Returns `true` for characters in the CJK Unified Ideographs block.
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Scoring weight of a single token.
///
/// Multi-character tokens weigh 2, single characters 1.
pub fn token_weight(token: &str) -> usize {
    if token.chars().count() > 1 { 2 } else { 1 }
}

/// Split `text` into a deduplicated set of lowercase keyword tokens.
///
/// The result is the union of:
///
/// 1. whitespace-separated words made only of `[a-z0-9]`, at least two long;
/// 2. every CJK ideograph as a one-character token;
/// 3. whitespace-separated words at least two characters long that contain a
///    CJK ideograph.
///
/// Any character that is not ASCII alphanumeric, whitespace or CJK is treated
/// as a separator. No stemming or stopword removal is applied.
///
/// # Example
///
/// ```rust
/// use advisor_rag::tokenizer::tokenize;
///
/// let tokens = tokenize("Project 費用 (v2)");
/// assert!(tokens.contains("project"));
/// assert!(tokens.contains("費用"));
/// assert!(tokens.contains("費"));
/// assert!(tokens.contains("v2"));
/// ```
pub fn tokenize(text: &str) -> BTreeSet<String> {
    if text.is_empty() {
        return BTreeSet::new();
    }

    let clean: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c.is_whitespace() || is_cjk(c) { c } else { ' ' })
        .collect();

    let mut tokens = BTreeSet::new();

    for word in clean.split_whitespace() {
        let len = word.chars().count();
        if len < 2 {
            continue;
        }
        let has_cjk = word.chars().any(is_cjk);
        if has_cjk || word.chars().all(|c| c.is_ascii_alphanumeric()) {
            tokens.insert(word.to_string());
        }
    }

    tokens.extend(clean.chars().filter(|c| is_cjk(*c)).map(String::from));

    tokens
}
