//! Pipeline Configuration

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::loader::{EmbeddingSource, TextEncoding};

/// A named list of words compared pairwise
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordList {
    pub name: String,
    pub words: Vec<String>,
}

impl WordList {
    pub fn new(name: impl Into<String>, words: &[&str]) -> Self {
        Self {
            name: name.into(),
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// On-disk layout of a word-list file
#[derive(Debug, Deserialize)]
struct WordListFile {
    #[serde(rename = "list", default)]
    lists: Vec<WordList>,
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the vector files
    pub input_dir: PathBuf,

    /// Directory the CSV matrices are written to
    pub output_dir: PathBuf,

    /// Sources processed, in order
    pub sources: Vec<EmbeddingSource>,

    /// ConceptNet language namespace, e.g. `de` for `/c/de/`
    pub language: String,

    /// Per-source file name overrides
    pub file_names: HashMap<EmbeddingSource, String>,

    /// Per-source text encodings (UTF-8 when absent)
    pub encodings: HashMap<EmbeddingSource, TextEncoding>,

    /// Word lists evaluated against every source
    pub word_lists: Vec<WordList>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./word_vectors"),
            output_dir: PathBuf::from("./out"),
            sources: EmbeddingSource::ALL.to_vec(),
            language: "de".to_string(),
            file_names: HashMap::new(),
            encodings: HashMap::new(),
            word_lists: default_word_lists(),
        }
    }
}

impl Config {
    pub fn with_input_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.input_dir = dir.into();
        self
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_sources(mut self, sources: Vec<EmbeddingSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Read `source` from `file_name` inside the input directory
    pub fn with_file_name(mut self, source: EmbeddingSource, file_name: impl Into<String>) -> Self {
        self.file_names.insert(source, file_name.into());
        self
    }

    pub fn with_encoding(mut self, source: EmbeddingSource, encoding: TextEncoding) -> Self {
        self.encodings.insert(source, encoding);
        self
    }

    pub fn with_word_lists(mut self, lists: Vec<WordList>) -> Self {
        self.word_lists = lists;
        self
    }

    /// Path of the vector file backing `source`
    pub fn vector_path(&self, source: EmbeddingSource) -> PathBuf {
        let name = self
            .file_names
            .get(&source)
            .map(String::as_str)
            .unwrap_or_else(|| source.default_file_name());
        self.input_dir.join(name)
    }

    pub fn encoding(&self, source: EmbeddingSource) -> TextEncoding {
        self.encodings.get(&source).copied().unwrap_or_default()
    }

    /// ConceptNet label prefix, e.g. `/c/de/`
    pub fn namespace(&self) -> String {
        format!("/c/{}/", self.language)
    }

    /// Output file for one (word list, source) matrix
    pub fn output_path(&self, list: &WordList, source: EmbeddingSource) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.csv", list.name, source.name()))
    }

    /// Load word lists from a TOML file of `[[list]]` tables
    pub fn load_word_lists(path: &Path) -> Result<Vec<WordList>> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        parse_word_lists(&contents)
            .map_err(|msg| Error::Config(format!("{}: {}", path.display(), msg)))
    }
}

fn parse_word_lists(contents: &str) -> std::result::Result<Vec<WordList>, String> {
    let file: WordListFile = toml::from_str(contents).map_err(|e| e.to_string())?;
    if file.lists.is_empty() {
        return Err("no [[list]] entries".to_string());
    }
    for list in &file.lists {
        if list.name.trim().is_empty() {
            return Err("word list with empty name".to_string());
        }
        if list.name.contains(['/', '\\']) || list.name == "." || list.name == ".." {
            return Err(format!("word list name '{}' is not a plain file name", list.name));
        }
        if list.words.is_empty() {
            return Err(format!("word list '{}' has no words", list.name));
        }
    }
    Ok(file.lists)
}

/// Built-in lists used when no word-list file is given
pub fn default_word_lists() -> Vec<WordList> {
    vec![
        WordList::new("nature", &["Mond", "Sonne", "See", "Baum", "Wald", "Berg"]),
        WordList::new("home", &["Haus", "Tür", "Fenster", "Dach", "Garten"]),
    ]
}
