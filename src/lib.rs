//! numtriad: triad scoring (∆ structure, ∞ abstraction, Θ concreteness) and
//! triad-aware retrieval over an in-memory document index.

pub mod core;
pub mod scorer;
pub mod search;
pub mod triad;

pub use crate::core::error::{Result, TriadError};
pub use scorer::{create_scorer, ScoredEmbedding, ScorerKind, TriadScorer};
pub use search::{
    DocumentIndex, RankingConfig, SearchHit, SearchOptions, SearchResult, TriadRankingEngine,
};
pub use triad::{TriadPreset, TriadValue};
