//! JSON output types for MCP tools

use serde::Serialize;

use numtriad::scorer::{CompatibilityStatus, ScorerKind};
use numtriad::search::{IndexedDocument, RankingConfig, SearchHit};
use numtriad::{TriadPreset, TriadValue};

/// Scored text for JSON output
#[derive(Debug, Serialize)]
pub struct ScoreJson {
    pub text: String,
    pub triad: TriadValue,
    pub embedding_dim: usize,
}

/// Mean alignment of a scored batch with a preset
#[derive(Debug, Serialize)]
pub struct AlignmentJson {
    pub target: TriadPreset,
    pub mean_distance: f64,
    pub mean_cosine: f64,
}

#[derive(Debug, Serialize)]
pub struct ScoreResultJson {
    pub scorer: String,
    pub kind: ScorerKind,
    pub results: Vec<ScoreJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<AlignmentJson>,
}

#[derive(Debug, Serialize)]
pub struct IndexResultJson {
    pub indexed: usize,
    pub total: usize,
}

/// Indexed document for JSON output
#[derive(Debug, Serialize)]
pub struct DocumentJson {
    pub id: String,
    pub text: String,
    pub triad: TriadValue,
}

impl From<&IndexedDocument> for DocumentJson {
    fn from(doc: &IndexedDocument) -> Self {
        Self {
            id: doc.id().to_string(),
            text: doc.text().to_string(),
            triad: doc.triad(),
        }
    }
}

/// Search hit for JSON output
#[derive(Debug, Serialize)]
pub struct SearchHitJson {
    pub id: String,
    pub text: String,
    pub triad: TriadValue,
    pub score: f64,
    pub semantic: f64,
    pub triad_alignment: f64,
    pub bias_alignment: f64,
}

impl From<&SearchHit<'_>> for SearchHitJson {
    fn from(hit: &SearchHit<'_>) -> Self {
        Self {
            id: hit.document.id().to_string(),
            text: hit.document.text().to_string(),
            triad: hit.document.triad(),
            score: hit.score,
            semantic: hit.semantic,
            triad_alignment: hit.triad_alignment,
            bias_alignment: hit.bias_alignment,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResultJson {
    pub query: String,
    pub query_triad: TriadValue,
    /// Query triad after target steering
    pub effective_triad: TriadValue,
    pub bias: Option<TriadValue>,
    pub target: Option<TriadPreset>,
    pub results: Vec<SearchHitJson>,
}

#[derive(Debug, Serialize)]
pub struct StatusJson {
    pub scorer: String,
    pub kind: ScorerKind,
    pub compatibility: CompatibilityStatus,
    pub ranking: RankingConfig,
    pub default_k: usize,
    pub documents: usize,
    pub dimension: Option<usize>,
}
