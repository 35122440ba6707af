//! Embedding File Reader
//!
//! Streams `<label> <f32> <f32> ...` lines from a vector file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};

/// Emit a progress event every this many rows
pub const PROGRESS_EVERY: usize = 100_000;

/// Text encoding of a vector file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1, every byte is one code point
    Latin1,
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf8" | "utf-8" => Ok(TextEncoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(Error::Config(format!("unknown text encoding '{}'", other))),
        }
    }
}

/// One parsed row, label not yet normalized
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line number in the source file
    pub line: usize,
    pub label: String,
    pub vector: Vec<f32>,
}

/// Lazy row iterator over one vector file.
///
/// Not seekable; reopen the file to start over.
pub struct VectorReader<R> {
    inner: R,
    path: PathBuf,
    encoding: TextEncoding,
    buf: Vec<u8>,
    line: usize,
    rows: usize,
    /// Set once the first non-blank line has been seen
    seen_line: bool,
    done: bool,
}

impl VectorReader<BufReader<File>> {
    /// Open a vector file for streaming
    pub fn open(path: impl AsRef<Path>, encoding: TextEncoding) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::new(BufReader::new(file), path, encoding))
    }
}

impl<R: BufRead> VectorReader<R> {
    /// Wrap an already-open reader; `path` is only used in diagnostics
    pub fn new(inner: R, path: impl Into<PathBuf>, encoding: TextEncoding) -> Self {
        Self {
            inner,
            path: path.into(),
            encoding,
            buf: Vec::with_capacity(4096),
            line: 0,
            rows: 0,
            seen_line: false,
            done: false,
        }
    }

    /// Rows yielded so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    fn parse_error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            path: self.path.clone(),
            line: self.line,
            message: message.into(),
        }
    }

    fn decode(&self) -> Result<String> {
        match self.encoding {
            TextEncoding::Utf8 => std::str::from_utf8(&self.buf)
                .map(str::to_owned)
                .map_err(|e| self.parse_error(format!("invalid UTF-8: {}", e))),
            TextEncoding::Latin1 => Ok(self.buf.iter().map(|&b| b as char).collect()),
        }
    }

    /// Read the next non-blank line, `Ok(None)` at end of file
    fn next_record(&mut self) -> Result<Option<RawRecord>> {
        loop {
            self.buf.clear();
            let n = self
                .inner
                .read_until(b'\n', &mut self.buf)
                .map_err(|e| Error::io(&self.path, e))?;
            if n == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.decode()?;
            let mut tokens = text.split_whitespace();
            let Some(label) = tokens.next() else {
                continue;
            };
            let rest: Vec<&str> = tokens.collect();

            let first = !self.seen_line;
            self.seen_line = true;
            if first && is_header(label, &rest) {
                debug!(path = %self.path.display(), header = %text.trim(), "Skipping header line");
                continue;
            }

            let mut vector = Vec::with_capacity(rest.len());
            for token in rest {
                let value = token
                    .parse::<f32>()
                    .map_err(|_| self.parse_error(format!("non-numeric coefficient '{}'", token)))?;
                if !value.is_finite() {
                    return Err(self.parse_error(format!("non-finite coefficient '{}'", token)));
                }
                vector.push(value);
            }

            self.rows += 1;
            if self.rows % PROGRESS_EVERY == 0 {
                debug!(path = %self.path.display(), rows = self.rows, "Reading vectors");
            }

            return Ok(Some(RawRecord {
                line: self.line,
                label: label.to_string(),
                vector,
            }));
        }
    }
}

/// `<count> <dim>` header written by word2vec-style text exports
fn is_header(label: &str, rest: &[&str]) -> bool {
    rest.len() == 1 && label.parse::<usize>().is_ok() && rest[0].parse::<usize>().is_ok()
}

impl<R: BufRead> Iterator for VectorReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn read_all(text: &[u8], encoding: TextEncoding) -> Result<Vec<RawRecord>> {
        VectorReader::new(Cursor::new(text.to_vec()), "test.txt", encoding).collect()
    }

    #[test]
    fn test_reads_rows_lazily() {
        let text = b"haus 0.1 0.2 0.3\nbaum -1 2.5 0\n";
        let mut reader = VectorReader::new(Cursor::new(text.to_vec()), "t", TextEncoding::Utf8);

        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.label, "haus");
        assert_eq!(first.vector, vec![0.1, 0.2, 0.3]);
        assert_eq!(reader.rows(), 1);

        let second = reader.next().unwrap().unwrap();
        assert_eq!(second.line, 2);
        assert_eq!(second.vector, vec![-1.0, 2.5, 0.0]);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_variable_whitespace_and_blank_lines() {
        let rows = read_all(b"see\t1.0   2.0\r\n\n   \nmond 3 4\n", TextEncoding::Utf8).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].vector, vec![1.0, 2.0]);
        assert_eq!(rows[1].label, "mond");
        assert_eq!(rows[1].line, 4);
    }

    #[test]
    fn test_non_numeric_token_is_parse_error() {
        let err = read_all(b"haus 0.1 0.2\nbaum 0.3 abc\n", TextEncoding::Utf8).unwrap_err();
        match err {
            Error::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_stops_after_error() {
        let mut reader = VectorReader::new(
            Cursor::new(b"a x\nb 1\n".to_vec()),
            "t",
            TextEncoding::Utf8,
        );
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_skips_count_dim_header() {
        let rows = read_all(b"2 3\nhaus 1 2 3\nbaum 4 5 6\n", TextEncoding::Utf8).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "haus");
    }

    #[test]
    fn test_header_after_blank_lines() {
        let rows = read_all(b"\n  \n2 3\nhaus 1 2 3\nbaum 4 5 6\n", TextEncoding::Utf8).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "haus");
        assert_eq!(rows[0].line, 4);
    }

    #[test]
    fn test_header_only_on_first_line() {
        let rows = read_all(b"haus 1\n2 3\n", TextEncoding::Utf8).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].label, "2");
        assert_eq!(rows[1].vector, vec![3.0]);
    }

    #[test]
    fn test_non_finite_token_is_parse_error() {
        let inputs: [&[u8]; 4] = [
            b"baum inf 1\n",
            b"baum 1 NaN\n",
            b"baum -infinity 0\n",
            b"baum 1e39 0\n",
        ];
        for text in inputs {
            match read_all(text, TextEncoding::Utf8).unwrap_err() {
                Error::Parse { line, message, .. } => {
                    assert_eq!(line, 1);
                    assert!(message.contains("non-finite"), "{}", message);
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        // Large but representable coefficients are kept
        let rows = read_all(b"haus 1e20 1e20\n", TextEncoding::Utf8).unwrap();
        assert_eq!(rows[0].vector, vec![1e20, 1e20]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Tür" in ISO-8859-1
        let rows = read_all(b"T\xfcr 1 0\n", TextEncoding::Latin1).unwrap();
        assert_eq!(rows[0].label, "Tür");

        assert!(read_all(b"T\xfcr 1 0\n", TextEncoding::Utf8).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        let err = VectorReader::open("/nonexistent/vectors.txt", TextEncoding::Utf8).err().unwrap();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sonne 0.5 0.5").unwrap();
        let rows: Vec<_> = VectorReader::open(file.path(), TextEncoding::Utf8)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "sonne");
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("UTF-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("latin_1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert!("ebcdic".parse::<TextEncoding>().is_err());
    }
}
