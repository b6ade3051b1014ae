//! Scorer compatibility status

use anyhow::Result;
use colored::*;

use numtriad::core::config::Config;
use numtriad::scorer::{CompatibilityStatus, ScorerKind};

pub fn run(json: bool) -> Result<()> {
    let config = Config::load_default();
    let status = CompatibilityStatus::probe(&config.scorer);
    let ranking = config.ranking_config();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "scorer": status,
                "ranking": {
                    "alpha": config.ranking.alpha,
                    "beta": config.ranking.beta,
                    "gamma": config.ranking.gamma,
                    "default_k": config.ranking.default_k,
                    "valid": ranking.is_ok(),
                },
            }))?
        );
        return Ok(());
    }

    println!("{}", "numtriad Status".bold());
    println!("{}", "=".repeat(50));
    println!();

    let mode = match status.mode {
        ScorerKind::Heuristic => status.mode.as_str().yellow(),
        _ => status.mode.as_str().green(),
    };
    println!("  {} Scorer: {}", "→".dimmed(), mode.bold());
    println!(
        "  {} Neural enabled: {}",
        "→".dimmed(),
        if status.neural_requested { "yes" } else { "no (scorer.neural = false)" }
    );

    match &status.model_location {
        Some(path) => println!(
            "  {} Model: {} {}",
            "✓".green(),
            status.model_id,
            path.display().to_string().dimmed()
        ),
        None => println!("  {} Model: {} (not found)", "✗".red(), status.model_id),
    }

    match (&status.regressor_path, status.regressor_available) {
        (Some(path), true) => println!("  {} Regressor: {}", "✓".green(), path.display()),
        (Some(path), false) => {
            println!("  {} Regressor: {} (missing)", "✗".red(), path.display())
        }
        (None, _) => println!("  {} Regressor: not configured", "✗".red()),
    }

    if let Some(reason) = status.missing_reason() {
        println!();
        println!("  {} Heuristic fallback: {}", "ℹ".blue(), reason);
    }

    println!();
    match ranking {
        Ok(r) => println!(
            "  {} Ranking: alpha={} beta={} gamma={} k={}",
            "→".dimmed(),
            r.alpha(),
            r.beta(),
            r.gamma(),
            config.ranking.default_k
        ),
        Err(e) => println!("  {} Ranking: {}", "!".yellow().bold(), e),
    }

    Ok(())
}
