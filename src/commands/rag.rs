//! RAG demo - four built-in documents ranked with an optional bias

use anyhow::Result;
use colored::*;

use numtriad::core::config::Config;
use numtriad::scorer::create_scorer;
use numtriad::search::{parse_k, DocumentIndex, SearchOptions, TriadRankingEngine};
use numtriad::{TriadPreset, TriadScorer, TriadValue};

/// Demo corpus: theory, tutorial, code example, overview
pub const DEMO_DOCUMENTS: [(&str, &str); 4] = [
    ("doc_0", "L'intelligence artificielle est un champ de recherche théorique."),
    ("doc_1", "Ce tutoriel montre comment déployer un modèle en production."),
    ("doc_2", "Voici un exemple de code pour effectuer une requête API."),
    ("doc_3", "Une vue d'ensemble des concepts de machine learning."),
];

pub fn run(
    query: &str,
    k: Option<i64>,
    preset: Option<TriadPreset>,
    target: Option<TriadPreset>,
    json: bool,
) -> Result<()> {
    let config = Config::load_default();
    let engine = TriadRankingEngine::new(config.ranking_config()?);
    let k = match k {
        Some(k) => parse_k(k)?,
        None => config.ranking.default_k,
    };

    let selected = create_scorer(&config.scorer);
    let scorer = selected.scorer.as_ref();

    let ids: Vec<&str> = DEMO_DOCUMENTS.iter().map(|(id, _)| *id).collect();
    let texts: Vec<&str> = DEMO_DOCUMENTS.iter().map(|(_, text)| *text).collect();
    let mut index = DocumentIndex::new();
    index.insert_batch(&ids, &texts, scorer)?;

    let bias: Option<TriadValue> = preset.map(|p| p.triad());
    let options = SearchOptions::top(k).with_bias(bias).with_target(target);
    let result = engine.search(query, &index, scorer, &options)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "query": query,
                "query_triad": result.query_triad,
                "effective_triad": result.effective_triad,
                "bias": preset.map(|p| p.as_str()),
                "target": target.map(|t| t.as_str()),
                "scorer": selected.kind(),
                "results": super::hits_json(&result.hits),
            }))?
        );
    } else {
        println!(
            "{} {} demo documents indexed with {}",
            "→".dimmed(),
            index.len(),
            scorer.name().cyan()
        );
        super::print_hits(query, &result, bias, target);
    }

    Ok(())
}
