//! wordsim Binary
//!
//! Writes one cosine-similarity CSV per (word list, embedding source).

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use wordsim::{Config, EmbeddingSource, Metrics, TextEncoding};

/// wordsim - Word Embedding Similarity Matrices
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding the vector files
    #[arg(short, long, default_value = "./word_vectors")]
    input_dir: PathBuf,

    /// Directory for the CSV matrices
    #[arg(short, long, default_value = "./out")]
    output_dir: PathBuf,

    /// Embedding source to process (repeatable; default: all)
    #[arg(short, long = "source")]
    sources: Vec<EmbeddingSource>,

    /// ConceptNet language namespace
    #[arg(long, default_value = "de")]
    language: String,

    /// TOML file with [[list]] tables (default: built-in lists)
    #[arg(short, long)]
    word_lists: Option<PathBuf>,

    /// Vector file name for a source, as SOURCE=FILE
    #[arg(long = "file", value_parser = parse_file_name)]
    file_names: Vec<(EmbeddingSource, String)>,

    /// Text encoding for a source, as SOURCE=ENCODING (utf-8, latin-1)
    #[arg(long = "encoding", value_parser = parse_encoding)]
    encodings: Vec<(EmbeddingSource, TextEncoding)>,
}

fn split_pair(s: &str) -> Result<(EmbeddingSource, &str), String> {
    let (source, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SOURCE=VALUE, got '{}'", s))?;
    let source = source.parse().map_err(|e: wordsim::Error| e.to_string())?;
    Ok((source, value))
}

fn parse_file_name(s: &str) -> Result<(EmbeddingSource, String), String> {
    let (source, file) = split_pair(s)?;
    Ok((source, file.to_string()))
}

fn parse_encoding(s: &str) -> Result<(EmbeddingSource, TextEncoding), String> {
    let (source, encoding) = split_pair(s)?;
    let encoding = encoding.parse().map_err(|e: wordsim::Error| e.to_string())?;
    Ok((source, encoding))
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wordsim=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = Config::default()
        .with_input_dir(&args.input_dir)
        .with_output_dir(&args.output_dir)
        .with_language(&args.language);

    if !args.sources.is_empty() {
        config = config.with_sources(args.sources.clone());
    }
    if let Some(path) = &args.word_lists {
        config = config.with_word_lists(Config::load_word_lists(path)?);
    }
    for (source, file) in args.file_names {
        config = config.with_file_name(source, file);
    }
    for (source, encoding) in args.encodings {
        config = config.with_encoding(source, encoding);
    }

    info!(
        "Computing {} word lists over {} sources from {}",
        config.word_lists.len(),
        config.sources.len(),
        config.input_dir.display()
    );

    let metrics = Metrics::new();
    let summary = wordsim::run(&config, &metrics)?;

    for (source, reason) in &summary.failed {
        error!("{}: {}", source, reason);
    }
    if summary.all_failed() {
        anyhow::bail!("no embedding source could be loaded");
    }

    info!("Wrote {} matrices to {}", summary.written.len(), config.output_dir.display());
    Ok(())
}
