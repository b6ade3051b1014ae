//! Search command - rank a JSON corpus against a query

use anyhow::{Context, Result};
use colored::*;
use serde::Deserialize;
use std::path::Path;

use numtriad::core::config::Config;
use numtriad::scorer::create_scorer;
use numtriad::search::{parse_k, DocumentIndex, SearchOptions, TriadRankingEngine};
use numtriad::triad::parse_bias;
use numtriad::TriadPreset;

/// One corpus entry: `{"id": "...", "text": "..."}`
#[derive(Debug, Deserialize)]
pub struct CorpusEntry {
    pub id: String,
    pub text: String,
}

pub fn load_corpus(path: &Path) -> Result<Vec<CorpusEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Corpus must be a JSON array of {{id, text}}: {}", path.display()))
}

pub fn run(
    query: &str,
    corpus: &Path,
    k: Option<i64>,
    bias: Option<&str>,
    target: Option<TriadPreset>,
    json: bool,
) -> Result<()> {
    let config = Config::load_default();
    let engine = TriadRankingEngine::new(config.ranking_config()?);
    let k = match k {
        Some(k) => parse_k(k)?,
        None => config.ranking.default_k,
    };
    let bias = bias.map(parse_bias).transpose()?;

    let entries = load_corpus(corpus)?;
    let selected = create_scorer(&config.scorer);
    let scorer = selected.scorer.as_ref();

    let mut index = DocumentIndex::new();
    if !entries.is_empty() {
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        index.insert_batch(&ids, &texts, scorer)?;
    }

    let options = SearchOptions::top(k).with_bias(bias).with_target(target);
    let result = engine.search(query, &index, scorer, &options)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "query": query,
                "query_triad": result.query_triad,
                "effective_triad": result.effective_triad,
                "bias": bias,
                "target": target.map(|t| t.as_str()),
                "scorer": selected.kind(),
                "results": super::hits_json(&result.hits),
            }))?
        );
    } else {
        println!(
            "{} {} documents indexed from {}",
            "→".dimmed(),
            index.len(),
            corpus.display().to_string().cyan()
        );
        super::print_hits(query, &result, bias, target);
    }

    Ok(())
}
