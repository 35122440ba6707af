//! Embedding Sources
//!
//! Per-format label normalization and table loading.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use tracing::{debug, info};

use super::reader::VectorReader;
use super::table::EmbeddingTable;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::Metrics;

/// Supported embedding table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingSource {
    /// Labels exported as Python byte literals, `b'Baum'`
    Word2Vec,
    GloVe,
    /// Full ConceptNet vectors, labels like `/c/de/baum`
    ConceptNet,
    /// ConceptNet Numberbatch, same label scheme, case preserved
    ConceptNetNb,
}

impl EmbeddingSource {
    pub const ALL: [EmbeddingSource; 4] = [
        EmbeddingSource::Word2Vec,
        EmbeddingSource::GloVe,
        EmbeddingSource::ConceptNet,
        EmbeddingSource::ConceptNetNb,
    ];

    /// Canonical name, used in output file names
    pub fn name(&self) -> &'static str {
        match self {
            EmbeddingSource::Word2Vec => "word2vec",
            EmbeddingSource::GloVe => "GloVe",
            EmbeddingSource::ConceptNet => "ConceptNet",
            EmbeddingSource::ConceptNetNb => "ConceptNetNB",
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            EmbeddingSource::Word2Vec => "word2vec.txt",
            EmbeddingSource::GloVe => "glove.txt",
            EmbeddingSource::ConceptNet => "conceptnet.txt",
            EmbeddingSource::ConceptNetNb => "conceptnet_nb.txt",
        }
    }

    /// Whether lookup keys are lowercased before matching
    pub fn is_case_insensitive(&self) -> bool {
        !matches!(self, EmbeddingSource::ConceptNetNb)
    }

    /// Map a raw file label to its lookup key, `None` drops the row
    pub fn normalize_label(&self, raw: &str, namespace: &str) -> Option<String> {
        match self {
            EmbeddingSource::Word2Vec => {
                let chars = raw.chars().count();
                if chars <= 3 {
                    return None;
                }
                Some(raw.chars().skip(2).take(chars - 3).collect())
            }
            EmbeddingSource::GloVe => Some(raw.to_string()),
            EmbeddingSource::ConceptNet | EmbeddingSource::ConceptNetNb => {
                let term = raw.strip_prefix(namespace)?;
                // `/c/de/baum/n` carries a part-of-speech suffix
                let term = term.split('/').next().unwrap_or(term);
                if term.is_empty() {
                    None
                } else {
                    Some(term.to_string())
                }
            }
        }
    }

    /// Stream this source's vector file into a table
    pub fn load(&self, config: &Config, metrics: &Metrics) -> Result<EmbeddingTable> {
        let path = config.vector_path(*self);
        let namespace = config.namespace();
        let start = Instant::now();

        info!(source = %self, path = %path.display(), "Loading embeddings");

        let reader = VectorReader::open(&path, config.encoding(*self))?;
        let mut table = EmbeddingTable::new(&path);
        let mut dropped = 0usize;

        for record in reader {
            let record = record?;
            match self.normalize_label(&record.label, &namespace) {
                Some(label) => {
                    table.push(record.line, label, &record.vector)?;
                    metrics.record_row(true);
                }
                None => {
                    dropped += 1;
                    metrics.record_row(false);
                }
            }
        }
        table.shrink_to_fit();

        let elapsed = start.elapsed();
        metrics.record_load(elapsed);
        if dropped > 0 {
            debug!(source = %self, dropped = dropped, "Rows rejected by label filter");
        }
        info!(
            source = %self,
            rows = table.len(),
            dropped = dropped,
            dim = table.dimension(),
            elapsed = ?elapsed,
            "Embeddings loaded"
        );

        Ok(table)
    }
}

impl fmt::Display for EmbeddingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EmbeddingSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "word2vec" => Ok(EmbeddingSource::Word2Vec),
            "glove" => Ok(EmbeddingSource::GloVe),
            "conceptnet" => Ok(EmbeddingSource::ConceptNet),
            "conceptnetnb" | "numberbatch" => Ok(EmbeddingSource::ConceptNetNb),
            _ => Err(Error::UnsupportedSource(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const NS: &str = "/c/de/";

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("WORD2VEC".parse::<EmbeddingSource>().unwrap(), EmbeddingSource::Word2Vec);
        assert_eq!("GloVe".parse::<EmbeddingSource>().unwrap(), EmbeddingSource::GloVe);
        assert_eq!("conceptNet".parse::<EmbeddingSource>().unwrap(), EmbeddingSource::ConceptNet);
        assert_eq!("ConceptNetNB".parse::<EmbeddingSource>().unwrap(), EmbeddingSource::ConceptNetNb);
    }

    #[test]
    fn test_unsupported_source() {
        let err = "fasttext".parse::<EmbeddingSource>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource(ref s) if s == "fasttext"));
        let msg = err.to_string();
        assert!(msg.contains("word2vec") && msg.contains("GloVe") && msg.contains("ConceptNet"));
    }

    #[test]
    fn test_word2vec_label() {
        let src = EmbeddingSource::Word2Vec;
        assert_eq!(src.normalize_label("b'Baum'", NS).as_deref(), Some("Baum"));
        assert_eq!(src.normalize_label("b'Tür'", NS).as_deref(), Some("Tür"));
        assert_eq!(src.normalize_label("b''", NS), None);
        assert_eq!(src.normalize_label("ab", NS), None);
    }

    #[test]
    fn test_glove_label() {
        let src = EmbeddingSource::GloVe;
        assert_eq!(src.normalize_label("haus", NS).as_deref(), Some("haus"));
        assert_eq!(src.normalize_label("/c/de/x", NS).as_deref(), Some("/c/de/x"));
    }

    #[test]
    fn test_conceptnet_label() {
        for src in [EmbeddingSource::ConceptNet, EmbeddingSource::ConceptNetNb] {
            assert_eq!(src.normalize_label("/c/de/Baum", NS).as_deref(), Some("Baum"));
            assert_eq!(src.normalize_label("/c/de/baum/n", NS).as_deref(), Some("baum"));
            assert_eq!(src.normalize_label("/c/en/tree", NS), None);
            assert_eq!(src.normalize_label("/c/de/", NS), None);
            assert_eq!(src.normalize_label("baum", NS), None);
        }
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(EmbeddingSource::Word2Vec.is_case_insensitive());
        assert!(EmbeddingSource::GloVe.is_case_insensitive());
        assert!(EmbeddingSource::ConceptNet.is_case_insensitive());
        assert!(!EmbeddingSource::ConceptNetNb.is_case_insensitive());
    }

    #[test]
    fn test_load_conceptnet_filters_namespace() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("conceptnet.txt"),
            "/c/de/baum 1 0\n/c/en/tree 0 1\n/c/de/haus 0.5 0.5\n",
        )
        .unwrap();

        let config = Config::default().with_input_dir(dir.path());
        let metrics = Metrics::new();
        let table = EmbeddingSource::ConceptNet.load(&config, &metrics).unwrap();

        assert_eq!(table.labels(), &["baum".to_string(), "haus".to_string()]);
        assert_eq!(table.dimension(), 2);
        assert_eq!(metrics.rows_read(), 3);
        assert_eq!(metrics.rows_dropped(), 1);
        assert_eq!(metrics.loads(), 1);
    }

    #[test]
    fn test_load_word2vec_with_header() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("w2v.txt"),
            "2 3\nb'mond' 1 2 3\nb'see' 4 5 6\n",
        )
        .unwrap();

        let config = Config::default()
            .with_input_dir(dir.path())
            .with_file_name(EmbeddingSource::Word2Vec, "w2v.txt");
        let table = EmbeddingSource::Word2Vec
            .load(&config, &Metrics::new())
            .unwrap();

        assert_eq!(table.labels(), &["mond".to_string(), "see".to_string()]);
        assert_eq!(table.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_load_parse_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("glove.txt"), "haus 1 2\nbaum 1 zwei\n").unwrap();

        let config = Config::default().with_input_dir(dir.path());
        let err = EmbeddingSource::GloVe
            .load(&config, &Metrics::new())
            .unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default().with_input_dir(dir.path());
        let err = EmbeddingSource::GloVe
            .load(&config, &Metrics::new())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
