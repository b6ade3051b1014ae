//! Triad scorers
//!
//! Every scorer turns a batch of texts (and, for the multimodal variant,
//! images) into one base embedding plus one [`TriadValue`] per input:
//! - HeuristicScorer: lexical features only (built-in, no model file)
//! - NeuralTextScorer: Model2Vec sentence embedding + regressor head
//! - NeuralMultimodalScorer: text + vision embedding + regressor head

pub mod embedder;
pub mod features;
pub mod heuristic;
pub mod multimodal;
pub mod neural;
pub mod regressor;
pub mod selection;
pub mod vision;

use image::DynamicImage;
use serde::Serialize;

use crate::core::error::{Result, TriadError};
use crate::triad::TriadValue;

pub use embedder::{Embedder, Model2VecEmbedder};
pub use heuristic::HeuristicScorer;
pub use multimodal::NeuralMultimodalScorer;
pub use neural::NeuralTextScorer;
pub use regressor::TriadRegressor;
pub use selection::{create_scorer, CompatibilityStatus, SelectedScorer};
pub use vision::{ThumbnailEncoder, VisionEncoder};

/// Which scorer variant produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    Heuristic,
    NeuralText,
    NeuralMultimodal,
}

impl ScorerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Heuristic => "heuristic",
            ScorerKind::NeuralText => "neural_text",
            ScorerKind::NeuralMultimodal => "neural_multimodal",
        }
    }
}

/// Triad scoring capability
///
/// Implementations must be deterministic: the same input always yields the
/// same triads. Scoring has no side effects once the scorer is constructed.
pub trait TriadScorer: Send + Sync {
    /// Score a non-empty batch of texts, with an optional parallel image batch.
    fn score(&self, texts: &[&str], images: Option<&[DynamicImage]>) -> Result<ScoredEmbedding>;

    /// Base embedding dimension, fixed for the scorer's lifetime
    fn dimension(&self) -> usize;

    fn kind(&self) -> ScorerKind;

    /// Get scorer name/identifier
    fn name(&self) -> &str;

    /// Score a single text
    fn score_one(&self, text: &str) -> Result<(Vec<f32>, TriadValue)> {
        let scored = self.score(&[text], None)?;
        scored
            .into_pairs()
            .next()
            .ok_or_else(|| TriadError::invalid("scorer returned an empty batch"))
    }
}

/// Shared batch checks: non-empty texts, image count matching text count.
pub fn validate_batch(texts: &[&str], images: Option<&[DynamicImage]>) -> Result<()> {
    if texts.is_empty() {
        return Err(TriadError::invalid("text batch is empty"));
    }
    if let Some(images) = images {
        if images.len() != texts.len() {
            return Err(TriadError::invalid(format!(
                "batch has {} texts but {} images",
                texts.len(),
                images.len()
            )));
        }
    }
    Ok(())
}

/// Reject image input for text-only variants.
pub(crate) fn reject_images(name: &str, images: Option<&[DynamicImage]>) -> Result<()> {
    match images {
        Some(_) => Err(TriadError::invalid(format!(
            "scorer '{}' is text-only and does not accept images",
            name
        ))),
        None => Ok(()),
    }
}

// ============================================================================
// Scored Embedding
// ============================================================================

/// Result of scoring a batch: parallel base embeddings and triads
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEmbedding {
    kind: ScorerKind,
    embeddings: Vec<Vec<f32>>,
    triads: Vec<TriadValue>,
}

impl ScoredEmbedding {
    pub fn new(
        kind: ScorerKind,
        embeddings: Vec<Vec<f32>>,
        triads: Vec<TriadValue>,
    ) -> Result<Self> {
        if embeddings.len() != triads.len() {
            return Err(TriadError::invalid(format!(
                "scorer produced {} embeddings but {} triads",
                embeddings.len(),
                triads.len()
            )));
        }
        Ok(Self {
            kind,
            embeddings,
            triads,
        })
    }

    pub fn kind(&self) -> ScorerKind {
        self.kind
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn triads(&self) -> &[TriadValue] {
        &self.triads
    }

    pub fn len(&self) -> usize {
        self.triads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triads.is_empty()
    }

    pub fn into_pairs(self) -> impl Iterator<Item = (Vec<f32>, TriadValue)> {
        self.embeddings.into_iter().zip(self.triads)
    }
}
