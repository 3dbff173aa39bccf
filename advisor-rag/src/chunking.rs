//! Paragraph chunking for Markdown documents.
//!
//! This module provides the [`Chunker`] trait and [`ParagraphChunker`], which
//! splits a document at blank lines into stably addressed paragraphs. Each
//! paragraph carries the nearest preceding Markdown heading as its section
//! title. Headings are emitted as chunks of their own so they can be cited.
//!
//! Paragraph IDs have the form `{document_id}-p{index}` and must stay stable
//! for identical input: they are stored in citations and deep links.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::{DocumentChunk, SourceDocument};
use crate::tokenizer::tokenize;

/// Paragraphs shorter than this many characters are not retrievable.
///
/// This is the one canonical floor; headings are exempt from it.
pub const MIN_PARAGRAPH_CHARS: usize = 10;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#{1,6}[ \t]+(.+?)$").expect("unreachable error: invalid heading pattern")
});

/// A strategy for splitting documents into paragraph chunks.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks, in reading order.
    ///
    /// Returns an empty `Vec` if the document has empty content.
    fn chunk(&self, document: &SourceDocument) -> Vec<DocumentChunk>;
}

/// Splits Markdown at blank lines into paragraphs.
///
/// # Example
///
/// ```rust
/// use advisor_rag::chunking::{Chunker, ParagraphChunker};
/// use advisor_rag::SourceDocument;
///
/// let doc = SourceDocument::new("charter", "Project Charter", "# Scope\n\nThe project covers intake.");
/// let chunks = ParagraphChunker::default().chunk(&doc);
/// assert_eq!(chunks[1].paragraph_id, "charter-p1");
/// assert_eq!(chunks[1].section_title.as_deref(), Some("Scope"));
/// ```
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    min_chars: usize,
}

impl ParagraphChunker {
    /// Create a chunker that drops non-heading paragraphs shorter than
    /// `min_chars` characters.
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

}

impl Default for ParagraphChunker {
    fn default() -> Self {
        Self::new(MIN_PARAGRAPH_CHARS)
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, document: &SourceDocument) -> Vec<DocumentChunk> {
        split_paragraphs(&document.id, &document.title, &document.content, self.min_chars)
    }
}

/// Split `markdown` into paragraph chunks using the default length floor.
pub fn chunk_document(
    document_id: &str,
    document_title: &str,
    markdown: &str,
) -> Vec<DocumentChunk> {
    split_paragraphs(document_id, document_title, markdown, MIN_PARAGRAPH_CHARS)
}

/// Build the paragraph ID for `index` within `document_id`.
pub fn paragraph_id(document_id: &str, index: usize) -> String {
    format!("{document_id}-p{index}")
}

/// Split a paragraph ID into its document ID and paragraph index.
///
/// Returns `None` unless the ID ends in `-p` followed by a canonical decimal
/// index (no leading zeros) and the document part is non-empty.
pub fn parse_paragraph_id(paragraph_id: &str) -> Option<(&str, usize)> {
    let (document_id, index) = paragraph_id.rsplit_once("-p")?;
    if document_id.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if index.len() > 1 && index.starts_with('0') {
        return None;
    }
    Some((document_id, index.parse().ok()?))
}

/// The document ID part of a paragraph ID.
pub fn document_id_of(paragraph_id: &str) -> Option<&str> {
    parse_paragraph_id(paragraph_id).map(|(document_id, _)| document_id)
}

/// Identity of the document being split.
struct Origin<'a> {
    document_id: &'a str,
    document_title: &'a str,
    min_chars: usize,
}

/// State threaded through the fold over lines.
struct Accumulator<'a> {
    chunks: Vec<DocumentChunk>,
    pending: Vec<&'a str>,
    section_title: Option<String>,
    next_index: usize,
}

impl<'a> Accumulator<'a> {
    fn new() -> Self {
        Self { chunks: Vec::new(), pending: Vec::new(), section_title: None, next_index: 0 }
    }

    fn push_line(mut self, line: &'a str) -> Self {
        self.pending.push(line);
        self
    }

    /// Close the pending paragraph, emitting a chunk if it qualifies.
    fn flush(mut self, origin: &Origin<'_>) -> Self {
        if self.pending.is_empty() {
            return self;
        }
        let joined = self.pending.join("\n");
        self.pending.clear();
        let content = joined.trim();

        let heading = HEADING.captures(content).map(|caps| caps[1].trim().to_string());
        if heading.is_none() && content.chars().count() < origin.min_chars {
            return self;
        }

        // A heading is tagged with the section it closes, not the one it opens.
        let section_title = self.section_title.clone();
        self.emit(origin, content, section_title);
        if let Some(title) = heading {
            self.section_title = Some(title);
        }
        self
    }

    fn emit(&mut self, origin: &Origin<'_>, content: &str, section_title: Option<String>) {
        let index = self.next_index;
        self.chunks.push(DocumentChunk {
            document_id: origin.document_id.to_string(),
            document_title: origin.document_title.to_string(),
            paragraph_id: paragraph_id(origin.document_id, index),
            paragraph_index: index,
            section_title,
            content: content.to_string(),
            keywords: tokenize(content),
        });
        self.next_index += 1;
    }
}

fn split_paragraphs(
    document_id: &str,
    document_title: &str,
    markdown: &str,
    min_chars: usize,
) -> Vec<DocumentChunk> {
    if markdown.is_empty() {
        return Vec::new();
    }

    let origin = Origin { document_id, document_title, min_chars };
    markdown
        .split('\n')
        .fold(Accumulator::new(), |acc, line| {
            if line.trim().is_empty() { acc.flush(&origin) } else { acc.push_line(line) }
        })
        .flush(&origin)
        .chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_then_paragraphs() {
        let text = "## 總則\n\n這是一段內容文字測試。\n\n第二段內容測試文字。";
        let chunks = chunk_document("doc1", "Doc", text);

        let ids: Vec<&str> = chunks.iter().map(|c| c.paragraph_id.as_str()).collect();
        assert_eq!(ids, ["doc1-p0", "doc1-p1", "doc1-p2"]);
        assert_eq!(chunks[0].content, "## 總則");
        assert_eq!(chunks[0].section_title, None);
        assert_eq!(chunks[1].section_title.as_deref(), Some("總則"));
        assert_eq!(chunks[2].section_title.as_deref(), Some("總則"));
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_document("doc1", "Doc", "").is_empty());
        assert!(chunk_document("doc1", "Doc", "\n\n   \n").is_empty());
    }

    #[test]
    fn short_paragraphs_are_dropped_without_consuming_an_index() {
        let text = "---\n\nThis paragraph is long enough.\n\nok\n\nAnother long paragraph here.";
        let chunks = chunk_document("d", "D", text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].paragraph_index, 0);
        assert_eq!(chunks[1].paragraph_index, 1);
        assert_eq!(chunks[1].content, "Another long paragraph here.");
    }

    #[test]
    fn consecutive_lines_form_one_paragraph() {
        let text = "  first line of text\nsecond line of text  \n\n";
        let chunks = chunk_document("d", "D", text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "first line of text\nsecond line of text");
    }

    #[test]
    fn whitespace_only_lines_separate_paragraphs() {
        let text = "paragraph number one\n   \t\nparagraph number two";
        let chunks = chunk_document("d", "D", text);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn second_heading_is_tagged_with_the_previous_section() {
        let text = "# Intro\n\nOpening remarks for the reader.\n\n# Fees\n\nThe maintenance fee is monthly.";
        let chunks = chunk_document("d", "D", text);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[2].content, "# Fees");
        assert_eq!(chunks[2].section_title.as_deref(), Some("Intro"));
        assert_eq!(chunks[3].section_title.as_deref(), Some("Fees"));
    }

    #[test]
    fn multi_line_block_starting_with_hash_is_not_a_heading() {
        let text = "# Title\nbody text right below the title";
        let chunks = chunk_document("d", "D", text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].section_title, None);

        let next = chunk_document("d", "D", &format!("{text}\n\nfollowing paragraph text"));
        assert_eq!(next[1].section_title, None);
    }

    #[test]
    fn bare_hash_followed_by_a_line_is_not_a_heading() {
        let chunks = chunk_document("d", "D", "#\nok\n\nThis is a body paragraph.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].paragraph_id, "d-p0");
        assert_eq!(chunks[0].content, "This is a body paragraph.");
        assert_eq!(chunks[0].section_title, None);
    }

    #[test]
    fn seven_hashes_is_not_a_heading() {
        let chunks = chunk_document("d", "D", "####### too deep\n\nbody paragraph text");
        assert_eq!(chunks[1].section_title, None);
    }

    #[test]
    fn keywords_are_derived_from_content() {
        let chunks = chunk_document("d", "D", "Maintenance plan 費用 overview");
        assert_eq!(chunks[0].keywords, tokenize(&chunks[0].content));
    }

    #[test]
    fn custom_floor() {
        let doc = SourceDocument::new("d", "D", "tiny\n\nsmall one");
        assert_eq!(ParagraphChunker::new(3).chunk(&doc).len(), 2);
        assert_eq!(ParagraphChunker::default().chunk(&doc).len(), 0);
    }

    #[test]
    fn paragraph_ids_round_trip() {
        assert_eq!(paragraph_id("doc-charter", 3), "doc-charter-p3");
        assert_eq!(parse_paragraph_id("doc-charter-p3"), Some(("doc-charter", 3)));
        assert_eq!(parse_paragraph_id("doc-p1-p12"), Some(("doc-p1", 12)));
        assert_eq!(document_id_of("doc-charter-p0"), Some("doc-charter"));
    }

    #[test]
    fn malformed_paragraph_ids_are_rejected() {
        assert_eq!(parse_paragraph_id("doc-charter"), None);
        assert_eq!(parse_paragraph_id("-p3"), None);
        assert_eq!(parse_paragraph_id("doc-p"), None);
        assert_eq!(parse_paragraph_id("doc-p03"), None);
        assert_eq!(parse_paragraph_id("doc-p3a"), None);
    }
}
