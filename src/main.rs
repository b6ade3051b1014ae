mod commands;
#[cfg(feature = "mcp")]
mod mcp;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use numtriad::core::logging::init_logging;
use numtriad::TriadPreset;

#[derive(Parser)]
#[command(name = "numtriad")]
#[command(about = "Triad (structure / abstraction / concreteness) scoring and triad-aware retrieval", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, global = true, help = "Debug logging on stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    // ===== MCP Server (also default) =====
    /// Start MCP server on stdio
    #[cfg(feature = "mcp")]
    Mcp,

    // ===== Core Commands =====
    /// Write numtriad.json with defaults
    Init {
        #[arg(long, help = "Overwrite an existing config with defaults")]
        force: bool,
    },
    /// Show which scorer will be used and why
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Score texts (and images) into triads
    Embed {
        texts: Vec<String>,
        #[arg(long = "image", help = "Image file, paired with texts in order (neural-multimodal)")]
        images: Vec<PathBuf>,
        #[arg(long, help = "Report alignment with a preset (abstract, concrete, balanced)")]
        target: Option<TriadPreset>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    // ===== Retrieval =====
    /// Rank the built-in demo documents
    Rag {
        query: String,
        #[arg(short, help = "Number of results (default from config)", allow_negative_numbers = true)]
        k: Option<i64>,
        #[arg(long = "abstract", help = "Bias toward abstract documents", conflicts_with = "concrete")]
        abstract_bias: bool,
        #[arg(long, help = "Bias toward concrete documents")]
        concrete: bool,
        #[arg(long, help = "Steer the query triad toward a preset (abstract, concrete, balanced)")]
        target: Option<TriadPreset>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Rank a JSON corpus ([{"id", "text"}, ...])
    Search {
        query: String,
        #[arg(long, help = "Corpus JSON file")]
        corpus: PathBuf,
        #[arg(short, help = "Number of results (default from config)", allow_negative_numbers = true)]
        k: Option<i64>,
        #[arg(long, help = "Bias preset (abstract, concrete, balanced) or 'd,a,c'")]
        bias: Option<String>,
        #[arg(long, help = "Steer the query triad toward a preset (abstract, concrete, balanced)")]
        target: Option<TriadPreset>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        // Default: run MCP server
        None => {
            #[cfg(feature = "mcp")]
            {
                run_mcp_server()
            }
            #[cfg(not(feature = "mcp"))]
            {
                eprintln!("MCP feature not enabled. Build with --features mcp");
                std::process::exit(1);
            }
        }

        #[cfg(feature = "mcp")]
        Some(Commands::Mcp) => run_mcp_server(),

        Some(Commands::Init { force }) => commands::init::run(force),
        Some(Commands::Status { json }) => commands::status::run(json),
        Some(Commands::Embed {
            texts,
            images,
            target,
            json,
        }) => commands::embed::run(&texts, &images, target, json),

        Some(Commands::Rag {
            query,
            k,
            abstract_bias,
            concrete,
            target,
            json,
        }) => {
            let preset = if abstract_bias {
                Some(TriadPreset::Abstract)
            } else if concrete {
                Some(TriadPreset::Concrete)
            } else {
                None
            };
            commands::rag::run(&query, k, preset, target, json)
        }
        Some(Commands::Search {
            query,
            corpus,
            k,
            bias,
            target,
            json,
        }) => commands::search::run(&query, &corpus, k, bias.as_deref(), target, json),
    }
}

#[cfg(feature = "mcp")]
fn run_mcp_server() -> anyhow::Result<()> {
    let config = numtriad::core::config::Config::load_default();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(mcp::run_mcp_server(config))
}
