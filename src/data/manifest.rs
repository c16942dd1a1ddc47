//! Tab-separated label manifest.
//!
//! Format:
//! - UTF-8, one record per line: `<relative-image-path>\t<label>`
//! - exactly two fields, both non-empty
//! - CRLF line endings and a leading byte-order mark are tolerated; blank
//!   lines are ignored
//! - fields are taken exactly as written, without trimming
//!
//! Lines are parsed independently. A bad line is kept as
//! [`ManifestLine::Malformed`] so the loader can report it without aborting.
use std::path::{Path, PathBuf};

use crate::error::TrainerError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One well-formed manifest record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 1-based line number in the manifest file.
    pub line: usize,
    pub image_path: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    Entry(ManifestEntry),
    Malformed {
        line: usize,
        raw: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub source: PathBuf,
    pub lines: Vec<ManifestLine>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl Manifest {
    /// Reads and parses a manifest file. Only an unreadable file is an error.
    pub fn read(path: &Path) -> Result<Manifest, TrainerError> {
        let bytes = std::fs::read(path).map_err(|e| TrainerError::io(path, e))?;
        let mut manifest = Manifest::parse_bytes(&bytes);
        manifest.source = path.to_path_buf();
        Ok(manifest)
    }

    /// Parses manifest text.
    pub fn parse(text: &str) -> Manifest {
        Manifest::parse_bytes(text.as_bytes())
    }

    /// Parses raw manifest bytes, decoding each line on its own.
    ///
    /// A leading UTF-8 byte-order mark is dropped. A line that is not valid
    /// UTF-8 becomes [`ManifestLine::Malformed`]; the other lines are unaffected.
    pub fn parse_bytes(bytes: &[u8]) -> Manifest {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let lines = bytes
            .split(|&b| b == b'\n')
            .enumerate()
            .filter_map(|(idx, raw)| {
                let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
                let line = idx + 1;
                match std::str::from_utf8(raw) {
                    Ok(text) if text.trim().is_empty() => None,
                    Ok(text) => Some(parse_line(line, text)),
                    Err(err) => Some(ManifestLine::Malformed {
                        line,
                        raw: String::from_utf8_lossy(raw).into_owned(),
                        reason: format!("line is not valid UTF-8: {}", err),
                    }),
                }
            })
            .collect();
        Manifest {
            source: PathBuf::new(),
            lines,
        }
    }

    /// Number of non-blank lines, well-formed or not.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.lines.iter().filter_map(|l| match l {
            ManifestLine::Entry(e) => Some(e),
            ManifestLine::Malformed { .. } => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_line(line: usize, raw: &str) -> ManifestLine {
    let fields: Vec<&str> = raw.split('\t').collect();
    if fields.len() != 2 {
        return ManifestLine::Malformed {
            line,
            raw: raw.to_string(),
            reason: format!("expected 2 tab-separated fields, found {}", fields.len()),
        };
    }
    let (path, label) = (fields[0], fields[1]);
    if path.is_empty() || label.is_empty() {
        return ManifestLine::Malformed {
            line,
            raw: raw.to_string(),
            reason: "image path and label must both be non-empty".into(),
        };
    }
    ManifestLine::Entry(ManifestEntry {
        line,
        image_path: path.to_string(),
        label: label.to_string(),
    })
}
