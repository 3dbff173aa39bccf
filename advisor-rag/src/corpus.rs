//! Immutable corpus snapshots.
//!
//! A [`Corpus`] is the concatenation of every document's chunks, in document
//! order. It is never patched in place: when the document set changes, build a
//! new snapshot. Cloning is cheap, so a snapshot can be handed to any number of
//! concurrent queries.

use std::sync::Arc;

use tracing::debug;

use crate::chunking::{Chunker, ParagraphChunker};
use crate::document::{DocumentChunk, SourceDocument};

/// A read-only snapshot of all chunks derived from a document set.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    chunks: Arc<[DocumentChunk]>,
}

impl Corpus {
    /// Chunk every document with the default [`ParagraphChunker`].
    pub fn build(documents: &[SourceDocument]) -> Self {
        Self::build_with(&ParagraphChunker::default(), documents)
    }

    /// Chunk every document with `chunker`, concatenating in input order.
    pub fn build_with(chunker: &dyn Chunker, documents: &[SourceDocument]) -> Self {
        let chunks: Vec<DocumentChunk> =
            documents.iter().flat_map(|document| chunker.chunk(document)).collect();
        debug!(document_count = documents.len(), chunk_count = chunks.len(), "built corpus");
        Self { chunks: chunks.into() }
    }

    /// All chunks, in corpus order.
    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    /// Chunks belonging to one document.
    pub fn document_chunks<'a>(
        &'a self,
        document_id: &'a str,
    ) -> impl Iterator<Item = &'a DocumentChunk> + 'a {
        self.chunks.iter().filter(move |chunk| chunk.document_id == document_id)
    }

    /// Look up a chunk by paragraph ID.
    pub fn get(&self, paragraph_id: &str) -> Option<&DocumentChunk> {
        self.chunks.iter().find(|chunk| chunk.paragraph_id == paragraph_id)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
