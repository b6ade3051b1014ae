//! Neural-multimodal scorer
//!
//! Regressor input is `[text embedding | vision embedding | features]`. A
//! missing modality is zero-filled, so text-only, image-only and paired
//! batches all go through the same head.

use image::DynamicImage;
use tracing::info;

use super::embedder::{Embedder, Model2VecEmbedder};
use super::features::LINGUISTIC_FEATURE_DIM;
use super::neural::{head_input, regressor_input_dim};
use super::regressor::TriadRegressor;
use super::selection::resolve_model_location;
use super::vision::{ThumbnailEncoder, VisionEncoder};
use super::{validate_batch, ScoredEmbedding, ScorerKind, TriadScorer};
use crate::core::config::ScorerSettings;
use crate::core::error::{Result, TriadError};
use crate::triad::TriadValue;

pub struct NeuralMultimodalScorer {
    text: Box<dyn Embedder>,
    vision: Box<dyn VisionEncoder>,
    regressor: TriadRegressor,
    linguistic_features: bool,
    name: String,
}

impl NeuralMultimodalScorer {
    pub fn new(
        text: Box<dyn Embedder>,
        vision: Box<dyn VisionEncoder>,
        regressor: TriadRegressor,
        linguistic_features: bool,
    ) -> Result<Self> {
        let expected =
            regressor_input_dim(text.dimension() + vision.dimension(), linguistic_features);
        if regressor.input_dim() != expected {
            return Err(TriadError::unavailable(format!(
                "regressor expects {} inputs but {} + {} give {}",
                regressor.input_dim(),
                text.name(),
                vision.name(),
                expected
            )));
        }

        let name = format!("neural-multimodal-{}-{}", text.name(), vision.name());
        Ok(Self {
            text,
            vision,
            regressor,
            linguistic_features,
            name,
        })
    }

    /// Model2Vec text backbone + thumbnail vision backbone + checkpoint
    pub fn load(settings: &ScorerSettings) -> Result<Self> {
        let model_path = resolve_model_location(settings).ok_or_else(|| {
            TriadError::unavailable(format!("embedding model '{}' not found", settings.model_id))
        })?;
        let regressor_path = settings
            .regressor_path
            .as_ref()
            .filter(|p| p.exists())
            .ok_or_else(|| TriadError::unavailable("regressor checkpoint not found"))?;

        let text = Model2VecEmbedder::from_path(&model_path)
            .map_err(|e| TriadError::unavailable(format!("{:#}", e)))?;
        let regressor = TriadRegressor::load(regressor_path)
            .map_err(|e| TriadError::unavailable(format!("{:#}", e)))?;

        info!("Loaded neural-multimodal scorer from {}", model_path.display());
        Self::new(
            Box::new(text),
            Box::new(ThumbnailEncoder::default()),
            regressor,
            settings.linguistic_features,
        )
    }

    pub fn text_dimension(&self) -> usize {
        self.text.dimension()
    }

    pub fn vision_dimension(&self) -> usize {
        self.vision.dimension()
    }

    /// Score images alone; text embedding and features are zero-filled
    pub fn score_images(&self, images: &[DynamicImage]) -> Result<ScoredEmbedding> {
        if images.is_empty() {
            return Err(TriadError::invalid("image batch is empty"));
        }

        let visions = self.encode_images(images)?;
        let text_zeros = vec![0.0f32; self.text.dimension()];
        let feature_zeros = vec![0.0f32; LINGUISTIC_FEATURE_DIM];

        let mut embeddings = Vec::with_capacity(images.len());
        let mut triads = Vec::with_capacity(images.len());
        for vision in visions {
            let embedding = head_input(&[text_zeros.as_slice(), vision.as_slice()], None);
            let mut input = embedding.clone();
            if self.linguistic_features {
                input.extend_from_slice(&feature_zeros);
            }
            triads.push(TriadValue::from_raw(self.regressor.predict(&input)?));
            embeddings.push(embedding);
        }

        ScoredEmbedding::new(ScorerKind::NeuralMultimodal, embeddings, triads)
    }

    fn encode_images(&self, images: &[DynamicImage]) -> Result<Vec<Vec<f32>>> {
        let visions = self.vision.encode(images)?;
        if visions.len() != images.len() {
            return Err(TriadError::Backend(anyhow::anyhow!(
                "vision encoder returned {} vectors for {} images",
                visions.len(),
                images.len()
            )));
        }
        Ok(visions)
    }
}

impl TriadScorer for NeuralMultimodalScorer {
    fn score(&self, texts: &[&str], images: Option<&[DynamicImage]>) -> Result<ScoredEmbedding> {
        validate_batch(texts, images)?;

        let text_embeddings = self.text.embed_batch(texts)?;
        if text_embeddings.len() != texts.len() {
            return Err(TriadError::Backend(anyhow::anyhow!(
                "embedder returned {} vectors for {} texts",
                text_embeddings.len(),
                texts.len()
            )));
        }
        let visions = match images {
            Some(images) => self.encode_images(images)?,
            None => vec![vec![0.0f32; self.vision.dimension()]; texts.len()],
        };

        let mut embeddings = Vec::with_capacity(texts.len());
        let mut triads = Vec::with_capacity(texts.len());
        for ((text_emb, vision), text) in text_embeddings.iter().zip(&visions).zip(texts) {
            let features = self.linguistic_features.then_some(*text);
            let input = head_input(&[text_emb.as_slice(), vision.as_slice()], features);
            triads.push(TriadValue::from_raw(self.regressor.predict(&input)?));
            embeddings.push(head_input(&[text_emb.as_slice(), vision.as_slice()], None));
        }

        ScoredEmbedding::new(ScorerKind::NeuralMultimodal, embeddings, triads)
    }

    fn dimension(&self) -> usize {
        self.text.dimension() + self.vision.dimension()
    }

    fn kind(&self) -> ScorerKind {
        ScorerKind::NeuralMultimodal
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::neural::CountingEmbedder;
    use crate::scorer::regressor::test_regressor;
    use image::{ImageBuffer, Luma};

    fn scorer(features: bool) -> NeuralMultimodalScorer {
        let vision = ThumbnailEncoder::new(2);
        let input_dim = regressor_input_dim(4 + vision.dimension(), features);
        NeuralMultimodalScorer::new(
            Box::new(CountingEmbedder),
            Box::new(vision),
            test_regressor(input_dim, 5),
            features,
        )
        .unwrap()
    }

    fn gray(level: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(ImageBuffer::from_pixel(6, 6, Luma([level])))
    }

    #[test]
    fn test_dimension_is_text_plus_vision() {
        let scorer = scorer(true);
        assert_eq!(scorer.dimension(), 8);
        assert_eq!(scorer.text_dimension(), 4);
        assert_eq!(scorer.vision_dimension(), 4);
    }

    #[test]
    fn test_new_rejects_mismatched_head() {
        let result = NeuralMultimodalScorer::new(
            Box::new(CountingEmbedder),
            Box::new(ThumbnailEncoder::new(2)),
            test_regressor(4, 5),
            false,
        );
        assert!(matches!(result, Err(TriadError::ScorerUnavailable(_))));
    }

    #[test]
    fn test_text_only_zero_fills_vision() {
        let scorer = scorer(true);
        let scored = scorer.score(&["Une théorie."], None).unwrap();

        assert_eq!(scored.kind(), ScorerKind::NeuralMultimodal);
        let embedding = &scored.embeddings()[0];
        assert_eq!(embedding.len(), 8);
        assert!(embedding[4..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_paired_batch_uses_images() {
        let scorer = scorer(false);
        let images = vec![gray(255), gray(0)];
        let scored = scorer.score(&["a", "a"], Some(images.as_slice())).unwrap();

        assert_eq!(scored.len(), 2);
        assert!(scored.embeddings()[0][4..].iter().all(|v| *v > 0.99));
        assert!(scored.embeddings()[1][4..].iter().all(|v| *v == 0.0));
        assert_eq!(scored.embeddings()[0][..4], scored.embeddings()[1][..4]);
    }

    #[test]
    fn test_black_image_matches_missing_image() {
        let scorer = scorer(true);
        let images = vec![gray(0)];
        let with_black = scorer.score(&["texte"], Some(images.as_slice())).unwrap();
        let without = scorer.score(&["texte"], None).unwrap();
        assert_eq!(with_black, without);
    }

    #[test]
    fn test_score_images_zero_fills_text() {
        let scorer = scorer(true);
        let scored = scorer.score_images(&[gray(200), gray(10)]).unwrap();

        assert_eq!(scored.len(), 2);
        for embedding in scored.embeddings() {
            assert!(embedding[..4].iter().all(|v| *v == 0.0));
        }
        for triad in scored.triads() {
            let sum = triad.delta() + triad.infinity() + triad.theta();
            assert!((sum - 1.0).abs() < 1e-9);
        }
        assert!(matches!(
            scorer.score_images(&[]),
            Err(TriadError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_image_count_must_match() {
        let scorer = scorer(false);
        let images = vec![gray(1)];
        assert!(matches!(
            scorer.score(&["a", "b"], Some(images.as_slice())),
            Err(TriadError::InvalidInput(_))
        ));
    }
}
