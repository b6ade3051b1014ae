//! Scorer selection
//!
//! Probes for the neural dependencies once at startup and builds the best
//! available scorer. The heuristic scorer is always available.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use super::embedder::cached_model_path;
use super::heuristic::HeuristicScorer;
use super::neural::NeuralTextScorer;
use super::{ScorerKind, TriadScorer};
use crate::core::config::ScorerSettings;

/// Local directory of the embedding model: explicit path first, then HF cache
pub fn resolve_model_location(settings: &ScorerSettings) -> Option<PathBuf> {
    settings
        .model_path
        .as_ref()
        .filter(|p| p.exists())
        .cloned()
        .or_else(|| cached_model_path(&settings.model_id))
}

/// What the neural path needs and whether it is present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityStatus {
    pub neural_requested: bool,
    pub model_id: String,
    pub model_location: Option<PathBuf>,
    pub model_available: bool,
    pub regressor_path: Option<PathBuf>,
    pub regressor_available: bool,
    /// Variant that [`create_scorer`] will try first
    pub mode: ScorerKind,
}

impl CompatibilityStatus {
    pub fn probe(settings: &ScorerSettings) -> Self {
        let model_location = resolve_model_location(settings);
        let regressor_available = settings
            .regressor_path
            .as_ref()
            .map(|p| p.is_file())
            .unwrap_or(false);
        let model_available = model_location.is_some();

        let mode = if settings.neural && model_available && regressor_available {
            ScorerKind::NeuralText
        } else {
            ScorerKind::Heuristic
        };

        Self {
            neural_requested: settings.neural,
            model_id: settings.model_id.clone(),
            model_location,
            model_available,
            regressor_path: settings.regressor_path.clone(),
            regressor_available,
            mode,
        }
    }

    pub fn neural_ready(&self) -> bool {
        self.model_available && self.regressor_available
    }

    /// Why the neural scorer will not be used, if it won't
    pub fn missing_reason(&self) -> Option<String> {
        if !self.neural_requested {
            return Some("neural scorer disabled in config (scorer.neural = false)".to_string());
        }
        if !self.model_available {
            return Some(format!("embedding model '{}' not found", self.model_id));
        }
        if !self.regressor_available {
            return Some("regressor checkpoint not found".to_string());
        }
        None
    }
}

/// Scorer chosen at startup, with the probe that led to it
pub struct SelectedScorer {
    pub scorer: Box<dyn TriadScorer>,
    pub status: CompatibilityStatus,
    pub fallback_reason: Option<String>,
}

impl SelectedScorer {
    pub fn kind(&self) -> ScorerKind {
        self.scorer.kind()
    }
}

/// Build the neural-text scorer when its dependencies are present, otherwise
/// the heuristic scorer
pub fn create_scorer(settings: &ScorerSettings) -> SelectedScorer {
    let status = CompatibilityStatus::probe(settings);

    let fallback_reason = if status.mode == ScorerKind::NeuralText {
        match NeuralTextScorer::load(settings) {
            Ok(scorer) => {
                info!("Using {} scorer ({})", ScorerKind::NeuralText.as_str(), scorer.name());
                return SelectedScorer {
                    scorer: Box::new(scorer),
                    status,
                    fallback_reason: None,
                };
            }
            Err(e) => {
                warn!("Neural scorer unavailable, falling back to heuristic: {}", e);
                Some(e.to_string())
            }
        }
    } else {
        let reason = status.missing_reason();
        if let Some(reason) = &reason {
            info!("Neural scorer not used: {}", reason);
        }
        reason
    };

    info!("Using {} scorer", ScorerKind::Heuristic.as_str());
    SelectedScorer {
        scorer: Box::new(HeuristicScorer::new()),
        status,
        fallback_reason,
    }
}
