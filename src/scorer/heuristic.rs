//! Heuristic scorer - rule-based triad from lexical features
//!
//! No model dependency. This is the fallback used when no trained model is
//! available. Text-only.

use image::DynamicImage;

use super::features::LexicalFeatures;
use super::{reject_images, validate_batch, ScoredEmbedding, ScorerKind, TriadScorer};
use crate::core::error::Result;
use crate::triad::TriadValue;

/// Dimension of the synthetic base embedding
pub const HEURISTIC_DIM: usize = 8;

/// Rule-based scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    /// Raw (unnormalized) triad scores
    ///
    /// - ∆: length, sentence count and logic connectors
    /// - ∞: share of abstract terms (10% abstract terms saturates)
    /// - Θ: numbers and concrete terms
    pub fn raw_scores(features: &LexicalFeatures) -> [f64; 3] {
        let delta = features.tokens as f64 / 50.0
            + features.sentences as f64 / 5.0
            + features.connectors as f64 / 5.0;
        let infinity = features.abstract_density() * 10.0;
        let theta = features.numbers as f64 / 5.0 + features.concrete_hits as f64 / 5.0;

        [delta.min(1.0), infinity.min(1.0), theta.min(1.0)]
    }

    /// Synthetic base embedding built from the same feature set
    pub fn embedding(features: &LexicalFeatures) -> Vec<f32> {
        vec![
            (features.chars as f64 / 200.0).min(1.0) as f32,
            (features.tokens as f64 / 50.0).min(1.0) as f32,
            features.lexical_diversity() as f32,
            features.punctuation_density() as f32,
            features.digit_density() as f32,
            features.uppercase_density() as f32,
            features.abstract_density() as f32,
            features.concrete_density() as f32,
        ]
    }

    pub fn score_text(text: &str) -> (Vec<f32>, TriadValue) {
        let features = LexicalFeatures::extract(text);
        let triad = TriadValue::from_raw(Self::raw_scores(&features));
        (Self::embedding(&features), triad)
    }
}

impl TriadScorer for HeuristicScorer {
    fn score(&self, texts: &[&str], images: Option<&[DynamicImage]>) -> Result<ScoredEmbedding> {
        validate_batch(texts, images)?;
        reject_images(self.name(), images)?;

        let (embeddings, triads): (Vec<_>, Vec<_>) =
            texts.iter().map(|t| Self::score_text(t)).unzip();
        ScoredEmbedding::new(ScorerKind::Heuristic, embeddings, triads)
    }

    fn dimension(&self) -> usize {
        HEURISTIC_DIM
    }

    fn kind(&self) -> ScorerKind {
        ScorerKind::Heuristic
    }

    fn name(&self) -> &str {
        "heuristic-lexical-8"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TriadError;

    #[test]
    fn test_theoretical_text_leans_abstract() {
        let (_, triad) =
            HeuristicScorer::score_text("L'intelligence artificielle est un champ de recherche théorique.");
        // raw = (0.38, 1.0, 0.0)
        assert!((triad.delta() - 0.38 / 1.38).abs() < 1e-9);
        assert!((triad.infinity() - 1.0 / 1.38).abs() < 1e-9);
        assert_eq!(triad.theta(), 0.0);
    }

    #[test]
    fn test_code_text_leans_concrete() {
        let (_, triad) =
            HeuristicScorer::score_text("Voici un exemple de code pour effectuer une requête API.");
        // raw = (0.4, 0.0, 0.8)
        assert!((triad.theta() - 0.8 / 1.2).abs() < 1e-9);
        assert_eq!(triad.infinity(), 0.0);
        assert!(triad.theta() > triad.delta());
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let (embedding, triad) = HeuristicScorer::score_text("");
        assert_eq!(triad, TriadValue::neutral());
        assert!(embedding.iter().all(|v| *v == 0.0));
        assert_eq!(embedding.len(), HEURISTIC_DIM);
    }

    #[test]
    fn test_score_batch_shape_and_determinism() {
        let scorer = HeuristicScorer::new();
        let texts = ["concepts abstraits", "Le serveur pèse 12 kg.", ""];

        let first = scorer.score(&texts, None).unwrap();
        let second = scorer.score(&texts, None).unwrap();

        assert_eq!(first.len(), texts.len());
        assert_eq!(first.kind(), ScorerKind::Heuristic);
        assert!(first.embeddings().iter().all(|e| e.len() == scorer.dimension()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_matches_single_scoring() {
        let scorer = HeuristicScorer::new();
        let texts = [
            "Une vue d'ensemble des concepts de machine learning.",
            "Ce tutoriel montre comment déployer un modèle en production.",
            "Donc, si la théorie tient, le modèle est juste.",
        ];

        let batch = scorer.score(&texts, None).unwrap();
        for (i, text) in texts.iter().enumerate() {
            let (embedding, triad) = scorer.score_one(text).unwrap();
            assert_eq!(batch.triads()[i], triad);
            assert_eq!(batch.embeddings()[i], embedding);
        }
    }

    #[test]
    fn test_rejects_images_and_empty_batch() {
        let scorer = HeuristicScorer::new();
        let images = vec![DynamicImage::new_rgb8(4, 4)];

        assert!(matches!(
            scorer.score(&["text"], Some(images.as_slice())),
            Err(TriadError::InvalidInput(_))
        ));
        assert!(matches!(
            scorer.score(&[], None),
            Err(TriadError::InvalidInput(_))
        ));
    }
}
