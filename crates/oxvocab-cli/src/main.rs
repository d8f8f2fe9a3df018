//! oxvocab CLI — the vocabulary quiz and its maintenance commands.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use oxvocab_core::model::CefrLevel;

mod commands;
mod context;
mod game;
mod report;

#[derive(Parser)]
#[command(
    name = "oxvocab",
    version,
    about = "Adaptive English vocabulary quiz with LLM translations"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Without a subcommand the interactive menu starts
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a game immediately
    Play {
        /// CEFR level for a custom game (a1..c2); all levels when omitted
        #[arg(long, conflicts_with = "adventure")]
        level: Option<CefrLevel>,

        /// Random levels from A1 to B2
        #[arg(long)]
        adventure: bool,
    },

    /// Show high scores and learning progress
    Stats {
        /// Restrict progress and word lists to one level
        #[arg(long)]
        level: Option<CefrLevel>,

        /// Rows per list
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Reset learning progress
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,

        /// Only reset this level
        #[arg(long)]
        level: Option<CefrLevel>,

        /// Only reset this word
        #[arg(long)]
        word: Option<String>,
    },

    /// Write scores and word statistics to a JSON file
    Export {
        /// Output path (default: timestamped file in the scores directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check configuration, credentials, and the vocabulary file
    Check {
        /// Also translate this word
        #[arg(long)]
        translate: Option<String>,

        /// Word class used with --translate
        #[arg(long, default_value = "noun")]
        class: String,
    },

    /// Create a starter config and sample word list
    Init,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "oxvocab=info,oxvocab_core=info,oxvocab_providers=info"
    } else {
        "oxvocab=warn,oxvocab_core=warn,oxvocab_providers=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config;
    let result = match cli.command {
        None => commands::play::menu(config).await,
        Some(Commands::Play { level, adventure }) => {
            commands::play::execute(level, adventure, config).await
        }
        Some(Commands::Stats { level, limit }) => commands::stats::execute(level, limit, config),
        Some(Commands::Reset { yes, level, word }) => {
            commands::reset::execute(yes, level, word, config)
        }
        Some(Commands::Export { output }) => commands::export::execute(output, config),
        Some(Commands::Check { translate, class }) => {
            commands::check::execute(translate, class, config).await
        }
        Some(Commands::Init) => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
