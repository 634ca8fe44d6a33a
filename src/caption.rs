//! Caption reading and writing.
//!
//! Captions are plain text files next to their image. The store reads and
//! writes them by pair position, applying one [`Normalization`] policy in
//! both directions so that whatever is saved loads back the same way.
//!
//! ## Normalization policies
//!
//! | Policy | On load | On save |
//! |--------|---------|---------|
//! | `trimmed` (default) | strip trailing whitespace and line breaks | rewrite every `\r\n` to `\r` |
//! | `raw` | contents unchanged | text unchanged |
//!
//! The `trimmed` save rule matches how existing caption folders were written,
//! so files already in that form stay byte-stable across edits.
//!
//! ## Missing captions
//!
//! A pair without a caption file loads as empty text, the same as an empty
//! file. [`CaptionStore::exists`] tells the two apart. Saving to such a pair
//! creates `<stem>.txt` only when `create_missing` is set and the text is
//! not blank.

use crate::scan::PairIndex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("could not read caption {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write caption {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// How caption text is transformed between disk and the edit buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Read and write text exactly as-is.
    Raw,
    /// Trim trailing whitespace on load, turn CRLF into CR on save.
    #[default]
    Trimmed,
}

impl Normalization {
    pub fn on_load(self, text: String) -> String {
        match self {
            Normalization::Raw => text,
            Normalization::Trimmed => {
                let kept = text.trim_end().len();
                let mut text = text;
                text.truncate(kept);
                text
            }
        }
    }

    pub fn on_save(self, text: &str) -> Cow<'_, str> {
        match self {
            Normalization::Trimmed if text.contains("\r\n") => {
                Cow::Owned(text.replace("\r\n", "\r"))
            }
            _ => Cow::Borrowed(text),
        }
    }
}

/// Result of [`CaptionStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// Nothing to write: the pair has no caption file and none was created.
    Skipped,
}

/// Reads and writes captions for the pairs of a [`PairIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionStore {
    pub normalization: Normalization,
    pub create_missing: bool,
}

impl Default for CaptionStore {
    fn default() -> Self {
        Self {
            normalization: Normalization::default(),
            create_missing: true,
        }
    }
}

impl CaptionStore {
    pub fn new(normalization: Normalization, create_missing: bool) -> Self {
        Self {
            normalization,
            create_missing,
        }
    }

    /// Whether a caption file currently exists for the pair at `position`.
    pub fn exists(&self, index: &PairIndex, position: usize) -> bool {
        index
            .get(position)
            .and_then(|record| record.caption_target())
            .is_some_and(|path| path.is_file())
    }

    /// Caption text for the pair at `position`.
    ///
    /// Out-of-range positions and missing files give empty text. Only a file
    /// that exists but cannot be read is an error.
    pub fn load(&self, index: &PairIndex, position: usize) -> Result<String, CaptionError> {
        let Some(path) = index.get(position).and_then(|r| r.caption_target()) else {
            return Ok(String::new());
        };
        if !path.is_file() {
            return Ok(String::new());
        }
        let text = fs::read_to_string(&path).map_err(|source| CaptionError::Read {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "loaded caption");
        Ok(self.normalization.on_load(text))
    }

    /// Write `text` as the caption of the pair at `position`.
    pub fn save(
        &self,
        index: &PairIndex,
        position: usize,
        text: &str,
    ) -> Result<SaveOutcome, CaptionError> {
        let Some(record) = index.get(position) else {
            return Ok(SaveOutcome::Skipped);
        };
        let path = match (&record.caption, record.caption_target()) {
            (Some(existing), _) => existing.clone(),
            (None, Some(target)) if self.create_missing && !text.trim().is_empty() => target,
            _ => return Ok(SaveOutcome::Skipped),
        };

        let body = self.normalization.on_save(text);
        fs::write(&path, body.as_bytes()).map_err(|source| CaptionError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = body.len(), "saved caption");
        Ok(SaveOutcome::Written(path))
    }
}
