//! Embedder trait and the Model2Vec implementation
//!
//! The sentence-embedding backbone used by the neural scorers. Its output is
//! opaque to the triad logic: only the dimension matters.

use anyhow::{Context, Result};
use model2vec::Model2Vec;
use std::path::{Path, PathBuf};

/// Embedding model abstraction
pub trait Embedder: Send + Sync {
    /// Generate embedding for a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimension
    fn dimension(&self) -> usize;

    /// Get model name/identifier
    fn name(&self) -> &str;
}

// ============================================================================
// Model2Vec Embedder
// ============================================================================

/// Model2Vec static sentence embedder
pub struct Model2VecEmbedder {
    model: Model2Vec,
    model_path: String,
    dimension: usize,
}

impl Model2VecEmbedder {
    /// Load model from local path
    pub fn from_path(path: &Path) -> Result<Self> {
        let model = Model2Vec::from_pretrained(path.to_string_lossy().as_ref(), None, None)
            .with_context(|| format!("Failed to load Model2Vec from: {}", path.display()))?;

        Self::with_model(model, path.to_string_lossy().to_string())
    }

    /// Load model from HuggingFace Hub
    pub fn from_pretrained(model_id: &str) -> Result<Self> {
        let model = Model2Vec::from_pretrained(model_id, None, None)
            .with_context(|| format!("Failed to load Model2Vec: {}", model_id))?;

        Self::with_model(model, model_id.to_string())
    }

    fn with_model(model: Model2Vec, model_path: String) -> Result<Self> {
        let probe = model
            .encode(&["dimension probe"])
            .context("Failed to probe embedding dimension")?;

        Ok(Self {
            dimension: probe.ncols(),
            model,
            model_path,
        })
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let texts = [text];
        let embeddings = self.model.encode(&texts).context("Failed to encode text")?;
        Ok(embeddings.row(0).to_vec())
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let embeddings = self.model.encode(texts).context("Failed to encode texts")?;
        Ok(embeddings.rows().into_iter().map(|r| r.to_vec()).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "model2vec"
    }
}

/// Local HuggingFace cache snapshot for a model id, if one was downloaded
pub fn cached_model_path(model_id: &str) -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let cache_path = PathBuf::from(home)
        .join(".cache/huggingface/hub")
        .join(format!("models--{}", model_id.replace('/', "--")))
        .join("snapshots");

    std::fs::read_dir(&cache_path)
        .ok()?
        .flatten()
        .find(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
}
