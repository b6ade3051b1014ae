//! Config initialization command

use anyhow::Result;
use colored::*;

use numtriad::core::config::{Config, CONFIG_FILE};

pub fn run(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    let config_path = root.join(CONFIG_FILE);
    let existed = config_path.exists();

    println!("{}", "numtriad Configuration Generator".bold());
    println!("{}", "=".repeat(50));
    println!();

    // Existing files are re-saved so missing fields get their defaults
    let config = if existed && !force {
        println!("{} Loading existing config...", "→".blue());
        Config::load_from_file(&config_path)?
    } else {
        Config::default()
    };

    let path = config.save(&root)?;

    if existed {
        println!("{} Updated {}", "✓".green(), path.display());
    } else {
        println!("{} Created {}", "✓".green(), path.display());
    }
    println!();
    println!("{}", Config::default_json()?.dimmed());
    println!();
    println!(
        "Point {} at a checkpoint to enable the neural scorer ({} forces the heuristic one).",
        "scorer.regressor_path".cyan(),
        "scorer.neural: false".cyan()
    );

    Ok(())
}
