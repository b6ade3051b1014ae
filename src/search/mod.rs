//! Triad-aware retrieval
//!
//! Documents are scored once at insert time; queries are scored and ranked
//! against the whole index.

pub mod engine;
pub mod index;

pub use engine::{
    parse_k, RankingConfig, SearchHit, SearchOptions, SearchResult, TriadRankingEngine,
};
pub use index::{DocumentIndex, IndexedDocument};
