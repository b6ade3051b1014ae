//! Embed command - score texts (and images) into triads

use anyhow::{bail, Context, Result};
use colored::*;
use image::DynamicImage;
use std::path::PathBuf;

use numtriad::core::config::Config;
use numtriad::scorer::{create_scorer, NeuralMultimodalScorer, TriadScorer};
use numtriad::triad::alignment_score;
use numtriad::{ScoredEmbedding, TriadPreset};

/// Mean L1 distance and mean cosine of the scored triads against a preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetAlignment {
    pub target: TriadPreset,
    pub distance: f64,
    pub cosine: f64,
}

impl TargetAlignment {
    pub fn measure(scored: &ScoredEmbedding, target: TriadPreset) -> Result<Self> {
        let targets = vec![target.triad(); scored.len()];
        let (distance, cosine) = alignment_score(scored.triads(), &targets)?;
        Ok(Self {
            target,
            distance,
            cosine,
        })
    }
}

pub fn run(
    texts: &[String],
    images: &[PathBuf],
    target: Option<TriadPreset>,
    json: bool,
) -> Result<()> {
    if texts.is_empty() && images.is_empty() {
        bail!("Nothing to score: pass at least one text or --image");
    }

    let config = Config::load_default();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let (scored, scorer_name, labels) = if images.is_empty() {
        let selected = create_scorer(&config.scorer);
        let scored = selected.scorer.score(&refs, None)?;
        (scored, selected.scorer.name().to_string(), texts.to_vec())
    } else {
        let scorer = NeuralMultimodalScorer::load(&config.scorer)
            .context("Image scoring needs the neural-multimodal scorer")?;
        let loaded = load_images(images)?;
        let scored = if texts.is_empty() {
            scorer.score_images(&loaded)?
        } else {
            scorer.score(&refs, Some(loaded.as_slice()))?
        };
        let labels = if texts.is_empty() {
            images.iter().map(|p| p.display().to_string()).collect()
        } else {
            texts.to_vec()
        };
        (scored, scorer.name().to_string(), labels)
    };

    let alignment = target
        .map(|t| TargetAlignment::measure(&scored, t))
        .transpose()?;

    if json {
        print_json(&scored, &scorer_name, &labels, alignment)
    } else {
        print_human(&scored, &scorer_name, &labels, alignment);
        Ok(())
    }
}

fn load_images(paths: &[PathBuf]) -> Result<Vec<DynamicImage>> {
    paths
        .iter()
        .map(|p| image::open(p).with_context(|| format!("Failed to open image: {}", p.display())))
        .collect()
}

fn print_json(
    scored: &ScoredEmbedding,
    scorer_name: &str,
    labels: &[String],
    alignment: Option<TargetAlignment>,
) -> Result<()> {
    let items: Vec<_> = labels
        .iter()
        .zip(scored.embeddings())
        .zip(scored.triads())
        .map(|((label, embedding), triad)| {
            serde_json::json!({
                "input": label,
                "triad": triad,
                "embedding": embedding,
            })
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "scorer": scorer_name,
            "kind": scored.kind(),
            "results": items,
            "alignment": alignment.map(|a| serde_json::json!({
                "target": a.target.as_str(),
                "mean_distance": a.distance,
                "mean_cosine": a.cosine,
            })),
        }))?
    );
    Ok(())
}

fn print_human(
    scored: &ScoredEmbedding,
    scorer_name: &str,
    labels: &[String],
    alignment: Option<TargetAlignment>,
) {
    println!(
        "{} Scored {} inputs with {}",
        "→".dimmed(),
        scored.len(),
        scorer_name.cyan()
    );
    println!();

    for ((label, embedding), triad) in labels
        .iter()
        .zip(scored.embeddings())
        .zip(scored.triads())
    {
        println!("  {}", super::truncate(label, 80).bold());
        println!("    {} ({} dims)", triad, embedding.len());
    }

    if let Some(a) = alignment {
        println!();
        println!(
            "  {} {} alignment: distance {:.3} | cosine {}",
            "→".dimmed(),
            a.target.as_str().cyan(),
            a.distance,
            super::colored_score(a.cosine)
        );
    }
}
