//! In-memory document index
//!
//! Documents keep their insertion order; ranking ties are broken by it.
//! The index is not internally synchronized. Shared use needs a read-write
//! lock around it: searches may share the read side, inserts take the write
//! side.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::core::error::{Result, TriadError};
use crate::scorer::TriadScorer;
use crate::triad::TriadValue;

/// A scored document, immutable once indexed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedDocument {
    id: String,
    text: String,
    #[serde(skip)]
    embedding: Vec<f32>,
    triad: TriadValue,
}

impl IndexedDocument {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn triad(&self) -> TriadValue {
        self.triad
    }
}

#[derive(Debug, Default)]
pub struct DocumentIndex {
    docs: Vec<IndexedDocument>,
    positions: HashMap<String, usize>,
    dimension: Option<usize>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `text` and store it under `id`
    pub fn insert(&mut self, id: &str, text: &str, scorer: &dyn TriadScorer) -> Result<()> {
        self.insert_batch(&[id], &[text], scorer)
    }

    /// Score all texts in one scorer call, then insert them together.
    ///
    /// Atomic: on any error (duplicate id in the index or within the batch,
    /// length mismatch, scoring failure) nothing is inserted.
    pub fn insert_batch(
        &mut self,
        ids: &[&str],
        texts: &[&str],
        scorer: &dyn TriadScorer,
    ) -> Result<()> {
        if ids.len() != texts.len() {
            return Err(TriadError::invalid(format!(
                "batch has {} ids but {} texts",
                ids.len(),
                texts.len()
            )));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if self.positions.contains_key(*id) || !seen.insert(*id) {
                return Err(TriadError::DuplicateDocument(id.to_string()));
            }
        }

        let scored = scorer.score(texts, None)?;
        if scored.len() != ids.len() {
            return Err(TriadError::invalid(format!(
                "scorer returned {} results for {} texts",
                scored.len(),
                ids.len()
            )));
        }

        let mut dimension = self.dimension;
        for embedding in scored.embeddings() {
            match dimension {
                Some(dim) if dim != embedding.len() => {
                    return Err(TriadError::invalid(format!(
                        "embedding dimension {} does not match index dimension {}",
                        embedding.len(),
                        dim
                    )));
                }
                _ => dimension = Some(embedding.len()),
            }
        }
        self.dimension = dimension;

        for ((id, text), (embedding, triad)) in ids.iter().zip(texts).zip(scored.into_pairs()) {
            self.positions.insert(id.to_string(), self.docs.len());
            self.docs.push(IndexedDocument {
                id: id.to_string(),
                text: text.to_string(),
                embedding,
                triad,
            });
        }

        debug!(
            "Indexed {} documents with {} (total {})",
            ids.len(),
            scorer.name(),
            self.docs.len()
        );
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&IndexedDocument> {
        self.positions
            .get(id)
            .map(|&pos| &self.docs[pos])
            .ok_or_else(|| TriadError::DocumentNotFound(id.to_string()))
    }

    /// All documents in insertion order
    pub fn all(&self) -> &[IndexedDocument] {
        &self.docs
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Embedding dimension, fixed by the first insert
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn clear(&mut self) {
        self.docs.clear();
        self.positions.clear();
        self.dimension = None;
    }
}
