//! Pipeline
//!
//! Loads each source in turn and writes one matrix per word list.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use tracing::{error, info};

use crate::config::{Config, WordList};
use crate::error::{Error, Result};
use crate::loader::EmbeddingSource;
use crate::metrics::Metrics;
use crate::vector::{EmbeddingStore, SimilarityMatrix};

/// Outcome of one pipeline run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// CSV files written, in order
    pub written: Vec<PathBuf>,
    /// Sources whose load failed, with the error message
    pub failed: Vec<(EmbeddingSource, String)>,
}

impl RunSummary {
    pub fn all_failed(&self) -> bool {
        self.written.is_empty() && !self.failed.is_empty()
    }
}

/// Run every configured source against every word list.
///
/// A source that fails to load is logged and skipped. Output errors abort
/// the run.
pub fn run(config: &Config, metrics: &Metrics) -> Result<RunSummary> {
    fs::create_dir_all(&config.output_dir).map_err(|e| Error::io(&config.output_dir, e))?;

    let mut summary = RunSummary::default();
    for (n, &source) in config.sources.iter().enumerate() {
        info!(
            "Processing source {}/{}: {}",
            n + 1,
            config.sources.len(),
            source
        );

        let table = match source.load(config, metrics) {
            Ok(table) => table,
            Err(e) => {
                error!(source = %source, "Failed to load embeddings: {}", e);
                summary.failed.push((source, e.to_string()));
                continue;
            }
        };
        let store = EmbeddingStore::new(source, table);

        for list in &config.word_lists {
            let path = write_matrix(config, &store, list, metrics)?;
            summary.written.push(path);
        }
    }

    info!(
        written = summary.written.len(),
        failed = summary.failed.len(),
        "{}",
        metrics.summary()
    );
    Ok(summary)
}

fn write_matrix(
    config: &Config,
    store: &EmbeddingStore,
    list: &WordList,
    metrics: &Metrics,
) -> Result<PathBuf> {
    let matrix = SimilarityMatrix::build(store, list.words.as_slice(), metrics);
    let path = config.output_path(list, store.source());

    let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
    matrix.write_csv(BufWriter::new(file))?;

    info!(
        source = %store.source(),
        list = %list.name,
        missing = matrix.missing_cells(),
        path = %path.display(),
        "Matrix written"
    );
    Ok(path)
}
