//! docrag: ask questions about a folder of documents

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use docrag::config::{Config, LogFormat, LoggingConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docrag")]
#[command(about = "Hybrid retrieval and answering over local documents")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "docrag.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question from the documents in a folder
    Ask {
        /// Question to answer
        query: String,

        /// Folder of .pdf / .txt / .md files
        #[arg(short, long)]
        docs: PathBuf,

        /// Number of evidence chunks
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,

        /// Model choice (auto, groq, openai)
        #[arg(short, long, default_value = "auto")]
        model: String,

        /// Sampling temperature override
        #[arg(long)]
        temperature: Option<f32>,

        /// Completion length override
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Skip the reranking pass
        #[arg(long)]
        no_rerank: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the chunks produced for a folder
    Chunks {
        /// Folder of documents
        path: PathBuf,
    },

    /// Write a default configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn init_logging(config: &LoggingConfig, verbosity: u8) -> Result<()> {
    let level = config.level.raised_by(verbosity).to_tracing();
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    init_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Ask {
            query,
            docs,
            top_k,
            model,
            temperature,
            max_tokens,
            no_rerank,
            format,
        } => {
            let options = commands::ask::build_options(&model, top_k, temperature, max_tokens, !no_rerank)?;
            commands::ask::ask(config, docs, query, options, matches!(format, OutputFormat::Json))
        }
        Commands::Chunks { path } => commands::chunks::show_chunks(config, path),
        Commands::Init { path } => commands::init::init_config(path),
    }
}
