//! Triad-aware ranking engine
//!
//! score(d) = alpha * semantic + beta * triad_alignment + gamma * bias_alignment
//!
//! - semantic: cosine of the query and document base embeddings
//! - triad_alignment: cosine of the query triad (steered toward a target
//!   preset when one is given) and the document triad
//! - bias_alignment: cosine of the caller bias and the document triad (0 without bias)
//!
//! Every query is a full O(N) scan over the index. There is no approximate
//! nearest-neighbor structure, so latency grows linearly with corpus size.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use super::index::{DocumentIndex, IndexedDocument};
use crate::core::error::{Result, TriadError};
use crate::scorer::TriadScorer;
use crate::triad::{TriadPreset, TriadValue};

/// Ranking weights. Independent, not required to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankingConfig {
    alpha: f64,
    beta: f64,
    gamma: f64,
}

impl RankingConfig {
    /// Each weight must be finite and non-negative, and alpha + beta > 0
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !value.is_finite() || value < 0.0 {
                return Err(TriadError::invalid(format!(
                    "{} must be a finite non-negative weight, got {}",
                    name, value
                )));
            }
        }
        if alpha + beta <= 0.0 {
            return Err(TriadError::invalid(
                "alpha + beta must be positive so that queries influence ranking",
            ));
        }
        Ok(Self { alpha, beta, gamma })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.7,
            beta: 0.3,
            gamma: 0.1,
        }
    }
}

/// Convert a caller-supplied result count
pub fn parse_k(k: i64) -> Result<usize> {
    usize::try_from(k).map_err(|_| TriadError::invalid(format!("k must be >= 0, got {}", k)))
}

/// Cosine similarity of two embeddings, zero norm replaced by 1.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm = |v: &[f32]| {
        let n = v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
        if n == 0.0 {
            1.0
        } else {
            n
        }
    };
    dot / (norm(a) * norm(b))
}

/// Ranked document with its combined score and sub-scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub document: &'a IndexedDocument,
    pub score: f64,
    pub semantic: f64,
    pub triad_alignment: f64,
    pub bias_alignment: f64,
}

/// Per-query ranking options
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of hits
    pub k: usize,
    /// Region documents should lean toward (the gamma term)
    pub bias: Option<TriadValue>,
    /// Steers the query triad before it is compared with document triads
    pub target: Option<TriadPreset>,
}

impl SearchOptions {
    pub fn top(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    pub fn with_bias(mut self, bias: Option<TriadValue>) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_target(mut self, target: Option<TriadPreset>) -> Self {
        self.target = target;
        self
    }
}

/// Ranked hits for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<'a> {
    /// Triad of the query as scored
    pub query_triad: TriadValue,
    /// Triad compared with document triads; the query triad unless a target steers it
    pub effective_triad: TriadValue,
    pub hits: Vec<SearchHit<'a>>,
}

/// Best score first. NaN ranks last and -0.0 ties with 0.0, so equal scores
/// keep insertion order under a stable sort.
fn by_score_desc(a: &SearchHit<'_>, b: &SearchHit<'_>) -> Ordering {
    let key = |score: f64| if score.is_nan() { f64::NEG_INFINITY } else { score };
    key(b.score)
        .partial_cmp(&key(a.score))
        .unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Default)]
pub struct TriadRankingEngine {
    config: RankingConfig,
}

impl TriadRankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Top `options.k` documents for `query`, best first.
    ///
    /// Ties keep insertion order. Returns `min(k, index.len())` hits.
    pub fn search<'a>(
        &self,
        query: &str,
        index: &'a DocumentIndex,
        scorer: &dyn TriadScorer,
        options: &SearchOptions,
    ) -> Result<SearchResult<'a>> {
        let (embedding, triad) = scorer.score_one(query)?;
        self.rank(&embedding, triad, index, options)
    }

    /// Rank several queries with a single scorer batch
    pub fn search_many<'a>(
        &self,
        queries: &[&str],
        index: &'a DocumentIndex,
        scorer: &dyn TriadScorer,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult<'a>>> {
        let scored = scorer.score(queries, None)?;
        scored
            .into_pairs()
            .map(|(embedding, triad)| self.rank(&embedding, triad, index, options))
            .collect()
    }

    fn rank<'a>(
        &self,
        query_embedding: &[f32],
        query_triad: TriadValue,
        index: &'a DocumentIndex,
        options: &SearchOptions,
    ) -> Result<SearchResult<'a>> {
        if let Some(dim) = index.dimension() {
            if dim != query_embedding.len() {
                return Err(TriadError::invalid(format!(
                    "query embedding dimension {} does not match index dimension {}",
                    query_embedding.len(),
                    dim
                )));
            }
        }

        let effective_triad = match options.target {
            Some(target) => query_triad.steer(target),
            None => query_triad,
        };

        let mut hits: Vec<SearchHit<'a>> = index
            .all()
            .iter()
            .map(|doc| {
                let semantic = cosine_similarity(query_embedding, doc.embedding());
                let triad_alignment = effective_triad.cosine_similarity(&doc.triad());
                let bias_alignment = options
                    .bias
                    .map(|b| b.cosine_similarity(&doc.triad()))
                    .unwrap_or(0.0);

                SearchHit {
                    document: doc,
                    score: self.config.alpha * semantic
                        + self.config.beta * triad_alignment
                        + self.config.gamma * bias_alignment,
                    semantic,
                    triad_alignment,
                    bias_alignment,
                }
            })
            .collect();

        hits.sort_by(by_score_desc);
        hits.truncate(options.k);

        debug!(
            "Ranked {} documents, returning {} (query {})",
            index.len(),
            hits.len(),
            effective_triad
        );
        Ok(SearchResult {
            query_triad,
            effective_triad,
            hits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::HeuristicScorer;

    const DOCS: [(&str, &str); 4] = [
        ("doc_0", "L'intelligence artificielle est un champ de recherche théorique."),
        ("doc_1", "Ce tutoriel montre comment déployer un modèle en production."),
        ("doc_2", "Voici un exemple de code pour effectuer une requête API."),
        ("doc_3", "Une vue d'ensemble des concepts de machine learning."),
    ];

    fn demo_index(scorer: &HeuristicScorer) -> DocumentIndex {
        let ids: Vec<&str> = DOCS.iter().map(|(id, _)| *id).collect();
        let texts: Vec<&str> = DOCS.iter().map(|(_, text)| *text).collect();
        let mut index = DocumentIndex::new();
        index.insert_batch(&ids, &texts, scorer).unwrap();
        index
    }

    fn hit_ids<'a>(hits: &[SearchHit<'a>]) -> Vec<&'a str> {
        hits.iter().map(|h| h.document.id()).collect()
    }

    fn hit_with_score(document: &IndexedDocument, score: f64) -> SearchHit<'_> {
        SearchHit {
            document,
            score,
            semantic: 0.0,
            triad_alignment: 0.0,
            bias_alignment: 0.0,
        }
    }

    #[test]
    fn test_ranking_config_validation() {
        assert!(RankingConfig::new(0.7, 0.3, 0.1).is_ok());
        assert!(RankingConfig::new(1.0, 1.0, 0.0).is_ok());
        assert!(RankingConfig::new(-0.1, 0.3, 0.1).is_err());
        assert!(RankingConfig::new(0.7, f64::NAN, 0.1).is_err());
        assert!(RankingConfig::new(0.7, 0.3, f64::INFINITY).is_err());
        assert!(RankingConfig::new(0.0, 0.0, 0.5).is_err());
        assert_eq!(RankingConfig::default(), RankingConfig::new(0.7, 0.3, 0.1).unwrap());
    }

    #[test]
    fn test_parse_k() {
        assert_eq!(parse_k(0).unwrap(), 0);
        assert_eq!(parse_k(5).unwrap(), 5);
        assert!(matches!(parse_k(-1), Err(TriadError::InvalidInput(_))));
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_end_to_end_abstract_bias() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let engine = TriadRankingEngine::default();

        let bias = TriadValue::normalize(0.1, 0.8, 0.1);
        let result = engine
            .search(
                "concepts abstraits",
                &index,
                &scorer,
                &SearchOptions::top(2).with_bias(Some(bias)),
            )
            .unwrap();

        assert_eq!(hit_ids(&result.hits), vec!["doc_0", "doc_3"]);
        assert!(result.hits[0].score >= result.hits[1].score);
    }

    #[test]
    fn test_result_carries_query_triad() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);

        let result = TriadRankingEngine::default()
            .search("exemple de code", &index, &scorer, &SearchOptions::top(2))
            .unwrap();

        let (_, expected) = scorer.score_one("exemple de code").unwrap();
        assert_eq!(result.query_triad, expected);
        assert_eq!(result.effective_triad, expected);
    }

    #[test]
    fn test_score_is_weighted_sum_of_sub_scores() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let engine = TriadRankingEngine::default();
        let bias = TriadPreset::Concrete.triad();

        let result = engine
            .search(
                "exemple de code",
                &index,
                &scorer,
                &SearchOptions::top(4).with_bias(Some(bias)),
            )
            .unwrap();
        for hit in &result.hits {
            let expected =
                0.7 * hit.semantic + 0.3 * hit.triad_alignment + 0.1 * hit.bias_alignment;
            assert!((hit.score - expected).abs() < 1e-12);
            assert!(
                (hit.bias_alignment - bias.cosine_similarity(&hit.document.triad())).abs() < 1e-12
            );
        }
    }

    #[test]
    fn test_no_bias_means_zero_bias_alignment() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let engine = TriadRankingEngine::default();

        let result = engine
            .search("concepts abstraits", &index, &scorer, &SearchOptions::top(4))
            .unwrap();
        assert!(result.hits.iter().all(|h| h.bias_alignment == 0.0));
    }

    #[test]
    fn test_target_steers_query_triad() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let engine = TriadRankingEngine::default();
        let query = "exemple de code";

        let plain = engine
            .search(query, &index, &scorer, &SearchOptions::top(4))
            .unwrap();
        let steered = engine
            .search(
                query,
                &index,
                &scorer,
                &SearchOptions::top(4).with_target(Some(TriadPreset::Abstract)),
            )
            .unwrap();

        assert_eq!(plain.query_triad, steered.query_triad);
        assert_eq!(
            steered.effective_triad,
            steered.query_triad.steer(TriadPreset::Abstract)
        );
        assert_ne!(steered.effective_triad, steered.query_triad);

        for hit in &steered.hits {
            let expected = steered.effective_triad.cosine_similarity(&hit.document.triad());
            assert!((hit.triad_alignment - expected).abs() < 1e-12);
        }

        // Steering toward abstract raises alignment with the theoretical document
        let alignment = |result: &SearchResult<'_>, id: &str| {
            result
                .hits
                .iter()
                .find(|h| h.document.id() == id)
                .map(|h| h.triad_alignment)
                .unwrap()
        };
        assert!(alignment(&steered, "doc_0") > alignment(&plain, "doc_0") + 0.1);
    }

    #[test]
    fn test_strong_bias_reorders_results() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let query = "exemple de code";

        let plain = TriadRankingEngine::default()
            .search(query, &index, &scorer, &SearchOptions::top(2))
            .unwrap();
        let mut plain_ids = hit_ids(&plain.hits);
        plain_ids.sort();
        assert_eq!(plain_ids, vec!["doc_1", "doc_2"]);

        let engine = TriadRankingEngine::new(RankingConfig::new(0.7, 0.3, 2.0).unwrap());
        let biased = engine
            .search(
                query,
                &index,
                &scorer,
                &SearchOptions::top(2).with_bias(Some(TriadPreset::Abstract.triad())),
            )
            .unwrap();
        let mut biased_ids = hit_ids(&biased.hits);
        biased_ids.sort();
        assert_eq!(biased_ids, vec!["doc_0", "doc_3"]);
    }

    #[test]
    fn test_search_is_deterministic() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let engine = TriadRankingEngine::default();
        let options = SearchOptions::top(4)
            .with_bias(Some(TriadPreset::Abstract.triad()))
            .with_target(Some(TriadPreset::Concrete));

        let first = engine.search("concepts", &index, &scorer, &options).unwrap();
        let second = engine.search("concepts", &index, &scorer, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_size_contract() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let engine = TriadRankingEngine::default();

        for k in 0..7 {
            let result = engine
                .search("requête", &index, &scorer, &SearchOptions::top(k))
                .unwrap();
            assert_eq!(result.hits.len(), k.min(index.len()));
        }

        let empty = DocumentIndex::new();
        assert!(engine
            .search("requête", &empty, &scorer, &SearchOptions::top(3))
            .unwrap()
            .hits
            .is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let scorer = HeuristicScorer::new();
        let mut index = DocumentIndex::new();
        index.insert("second", "Un texte identique.", &scorer).unwrap();
        index.insert("other", "Voici 42 exemples de code.", &scorer).unwrap();
        index.insert("first", "Un texte identique.", &scorer).unwrap();

        let result = TriadRankingEngine::default()
            .search("Un texte identique.", &index, &scorer, &SearchOptions::top(3))
            .unwrap();

        assert_eq!(result.hits[0].score, result.hits[1].score);
        assert_eq!(hit_ids(&result.hits)[..2], ["second", "first"]);
    }

    #[test]
    fn test_signed_zero_scores_tie_and_nan_ranks_last() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let docs = index.all();

        let mut hits = vec![
            hit_with_score(&docs[0], f64::NAN),
            hit_with_score(&docs[1], -0.0),
            hit_with_score(&docs[2], 0.0),
            hit_with_score(&docs[3], -1.0),
        ];
        hits.sort_by(by_score_desc);
        assert_eq!(hit_ids(&hits), vec!["doc_1", "doc_2", "doc_3", "doc_0"]);

        let mut hits = vec![hit_with_score(&docs[2], 0.0), hit_with_score(&docs[1], -0.0)];
        hits.sort_by(by_score_desc);
        assert_eq!(hit_ids(&hits), vec!["doc_2", "doc_1"]);
    }

    #[test]
    fn test_search_many_matches_individual_searches() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let engine = TriadRankingEngine::default();
        let queries = ["concepts abstraits", "exemple de code", "déployer en production"];
        let options = SearchOptions::top(3)
            .with_bias(Some(TriadPreset::Concrete.triad()))
            .with_target(Some(TriadPreset::Balanced));

        let batched = engine.search_many(&queries, &index, &scorer, &options).unwrap();
        assert_eq!(batched.len(), queries.len());
        for (query, result) in queries.iter().zip(&batched) {
            let single = engine.search(query, &index, &scorer, &options).unwrap();
            assert_eq!(result, &single);
        }
    }

    #[test]
    fn test_search_rejects_empty_query_batch() {
        let scorer = HeuristicScorer::new();
        let index = demo_index(&scorer);
        let engine = TriadRankingEngine::default();
        assert!(matches!(
            engine.search_many(&[], &index, &scorer, &SearchOptions::top(3)),
            Err(TriadError::InvalidInput(_))
        ));
    }
}
