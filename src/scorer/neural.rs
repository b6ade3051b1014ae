//! Neural-text scorer
//!
//! Sentence embedding from an [`Embedder`] backbone, optionally extended with
//! the linguistic feature vector, fed to a [`TriadRegressor`] head.

use image::DynamicImage;
use tracing::info;

use super::embedder::{Embedder, Model2VecEmbedder};
use super::features::{LexicalFeatures, LINGUISTIC_FEATURE_DIM};
use super::regressor::TriadRegressor;
use super::selection::resolve_model_location;
use super::{reject_images, validate_batch, ScoredEmbedding, ScorerKind, TriadScorer};
use crate::core::config::ScorerSettings;
use crate::core::error::{Result, TriadError};
use crate::triad::TriadValue;

pub struct NeuralTextScorer {
    embedder: Box<dyn Embedder>,
    regressor: TriadRegressor,
    linguistic_features: bool,
    name: String,
}

impl NeuralTextScorer {
    /// Fails with `ScorerUnavailable` when the head does not fit the backbone
    pub fn new(
        embedder: Box<dyn Embedder>,
        regressor: TriadRegressor,
        linguistic_features: bool,
    ) -> Result<Self> {
        let expected = regressor_input_dim(embedder.dimension(), linguistic_features);
        if regressor.input_dim() != expected {
            return Err(TriadError::unavailable(format!(
                "regressor expects {} inputs but {} embeddings{} give {}",
                regressor.input_dim(),
                embedder.name(),
                if linguistic_features { " + features" } else { "" },
                expected
            )));
        }

        let name = format!("neural-text-{}", embedder.name());
        Ok(Self {
            embedder,
            regressor,
            linguistic_features,
            name,
        })
    }

    /// Load the Model2Vec backbone and regressor checkpoint named in `settings`
    pub fn load(settings: &ScorerSettings) -> Result<Self> {
        let model_path = resolve_model_location(settings).ok_or_else(|| {
            TriadError::unavailable(format!("embedding model '{}' not found", settings.model_id))
        })?;
        let regressor_path = settings
            .regressor_path
            .as_ref()
            .filter(|p| p.exists())
            .ok_or_else(|| TriadError::unavailable("regressor checkpoint not found"))?;

        let embedder = Model2VecEmbedder::from_path(&model_path)
            .map_err(|e| TriadError::unavailable(format!("{:#}", e)))?;
        let regressor = TriadRegressor::load(regressor_path)
            .map_err(|e| TriadError::unavailable(format!("{:#}", e)))?;

        info!(
            "Loaded neural-text scorer from {} ({} dims)",
            model_path.display(),
            embedder.dimension()
        );
        Self::new(Box::new(embedder), regressor, settings.linguistic_features)
    }

    pub fn uses_linguistic_features(&self) -> bool {
        self.linguistic_features
    }
}

/// Regressor input size for a backbone dimension
pub fn regressor_input_dim(embedding_dim: usize, linguistic_features: bool) -> usize {
    if linguistic_features {
        embedding_dim + LINGUISTIC_FEATURE_DIM
    } else {
        embedding_dim
    }
}

/// `[embedding | features]` regressor input
pub(crate) fn head_input(parts: &[&[f32]], text: Option<&str>) -> Vec<f32> {
    let mut input: Vec<f32> = parts.iter().flat_map(|p| p.iter().copied()).collect();
    if let Some(text) = text {
        input.extend_from_slice(&LexicalFeatures::extract(text).linguistic_vector());
    }
    input
}

impl TriadScorer for NeuralTextScorer {
    fn score(&self, texts: &[&str], images: Option<&[DynamicImage]>) -> Result<ScoredEmbedding> {
        validate_batch(texts, images)?;
        reject_images(self.name(), images)?;

        let embeddings = self.embedder.embed_batch(texts)?;
        if embeddings.len() != texts.len() {
            return Err(TriadError::Backend(anyhow::anyhow!(
                "embedder returned {} vectors for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        let triads = embeddings
            .iter()
            .zip(texts)
            .map(|(embedding, text)| {
                let features = self.linguistic_features.then_some(*text);
                let input = head_input(&[embedding.as_slice()], features);
                Ok(TriadValue::from_raw(self.regressor.predict(&input)?))
            })
            .collect::<Result<Vec<_>>>()?;

        ScoredEmbedding::new(ScorerKind::NeuralText, embeddings, triads)
    }

    fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    fn kind(&self) -> ScorerKind {
        ScorerKind::NeuralText
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Deterministic embedder for tests: letter-class counts per text
#[cfg(test)]
pub(crate) struct CountingEmbedder;

#[cfg(test)]
impl Embedder for CountingEmbedder {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(vec![
            lower.chars().filter(|c| "aeiouyéèà".contains(*c)).count() as f32,
            lower.chars().filter(|c| c.is_alphabetic()).count() as f32,
            lower.chars().filter(|c| c.is_ascii_digit()).count() as f32,
            lower.split_whitespace().count() as f32,
        ])
    }

    fn embed_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimension(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        "counting"
    }
}
