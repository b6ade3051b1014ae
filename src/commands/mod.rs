pub mod embed;
pub mod init;
pub mod rag;
pub mod search;
pub mod status;

use colored::{ColoredString, Colorize};
use numtriad::{SearchHit, SearchResult, TriadPreset, TriadValue};

/// Color a score the way result lists do: green > 0.8, yellow > 0.6
pub fn colored_score(score: f64) -> ColoredString {
    let score_str = format!("{:.3}", score);
    if score > 0.8 {
        score_str.green()
    } else if score > 0.6 {
        score_str.yellow()
    } else {
        score_str.dimmed()
    }
}

/// Char-aware truncation for display
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

pub fn hits_json(hits: &[SearchHit<'_>]) -> Vec<serde_json::Value> {
    hits.iter()
        .map(|h| {
            serde_json::json!({
                "id": h.document.id(),
                "text": h.document.text(),
                "triad": h.document.triad(),
                "score": h.score,
                "semantic": h.semantic,
                "triad_alignment": h.triad_alignment,
                "bias_alignment": h.bias_alignment,
            })
        })
        .collect()
}

pub fn print_hits(
    query: &str,
    result: &SearchResult<'_>,
    bias: Option<TriadValue>,
    target: Option<TriadPreset>,
) {
    let hits = &result.hits;
    if hits.is_empty() {
        println!("{} No results found for: {}", "→".dimmed(), query.cyan());
        return;
    }

    println!(
        "{} {} results for: {}",
        "→".dimmed(),
        hits.len(),
        query.cyan()
    );
    println!("  {} query  {}", "·".dimmed(), result.query_triad);
    if let Some(target) = target {
        println!(
            "  {} target {} {}",
            "·".dimmed(),
            result.effective_triad,
            format!("({})", target.as_str()).dimmed()
        );
    }
    if let Some(bias) = bias {
        println!("  {} bias   {}", "·".dimmed(), bias);
    }
    println!();

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "{}. [{}] {}",
            (i + 1).to_string().bold(),
            colored_score(hit.score),
            hit.document.id().cyan()
        );
        println!("   {}", truncate(hit.document.text(), 100).dimmed());
        println!(
            "   {} | sem {:.3} | triad {:.3} | bias {:.3}",
            hit.document.triad(),
            hit.semantic,
            hit.triad_alignment,
            hit.bias_alignment
        );
        println!();
    }
}
