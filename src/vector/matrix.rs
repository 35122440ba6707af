//! Similarity Matrix
//!
//! Full N x N cosine-similarity table for one word list.

use std::io::Write;

use tracing::warn;

use super::embedding_store::{EmbeddingStore, Similarity};
use crate::error::Result;
use crate::metrics::Metrics;

/// Square matrix indexed by the same word list on both axes
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    words: Vec<String>,
    /// Row-major, `None` where either word is missing
    cells: Vec<Option<f32>>,
}

impl SimilarityMatrix {
    /// Compute every ordered pair, diagonal included.
    ///
    /// Each missing pair is logged on its own, so an unknown word shows up
    /// once per row and column it participates in.
    pub fn build<S: AsRef<str>>(store: &EmbeddingStore, words: &[S], metrics: &Metrics) -> Self {
        let words: Vec<String> = words.iter().map(|w| w.as_ref().to_string()).collect();
        let mut cells = Vec::with_capacity(words.len() * words.len());

        for row in &words {
            for col in &words {
                let cell = match store.cosine_similarity(row, col) {
                    Similarity::Value(sim) => Some(sim),
                    Similarity::Missing(reason) => {
                        warn!(
                            source = %store.source(),
                            word = reason.word(),
                            "Similarity {}/{} unavailable: {}",
                            row,
                            col,
                            reason
                        );
                        None
                    }
                };
                metrics.record_lookup(cell.is_none());
                cells.push(cell);
            }
        }

        Self { words, cells }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words on each axis
    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        let n = self.size();
        if row >= n || col >= n {
            return None;
        }
        self.cells[row * n + col]
    }

    /// Count of blank cells
    pub fn missing_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Write as CSV with the word list as header row and first column
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.size() + 1);
        header.push(String::new());
        header.extend(self.words.iter().cloned());
        wtr.write_record(&header)?;

        let n = self.size();
        for (i, word) in self.words.iter().enumerate() {
            let mut record = Vec::with_capacity(n + 1);
            record.push(word.clone());
            record.extend(
                self.cells[i * n..(i + 1) * n]
                    .iter()
                    .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }

        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
