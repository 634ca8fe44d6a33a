//! Shared test utilities for the caption-deck test suite.
//!
//! Builds throwaway caption folders and provides a display surface that
//! records everything the session shows it.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (tmp, index) = index_with(&[("a.png", ""), ("a.txt", "a caption")]);
//! assert_eq!(pair_stems(&index), vec!["a"]);
//! assert_eq!(read(&tmp, "a.txt"), "a caption");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::PairIndex;
use crate::session::{DisplaySurface, PairView, SessionError};

/// Images are never decoded, so any bytes will do.
pub const FAKE_PNG: &[u8] = b"fake image";

// =========================================================================
// Folder setup
// =========================================================================

/// Copy `fixtures/folder/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/folder");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

/// Create a temp folder holding the given `(name, contents)` files.
///
/// Empty contents for a `.png` are replaced with [`FAKE_PNG`].
pub fn folder_with(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, contents) in files {
        let path = tmp.path().join(name);
        let is_png = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png && contents.is_empty() {
            std::fs::write(&path, FAKE_PNG).unwrap();
        } else {
            std::fs::write(&path, contents).unwrap();
        }
    }
    tmp
}

/// [`folder_with`] plus the index built from it.
pub fn index_with(files: &[(&str, &str)]) -> (TempDir, PairIndex) {
    let tmp = folder_with(files);
    let index = PairIndex::open(tmp.path());
    (tmp, index)
}

/// Read a file from the temp folder as text. Panics if missing.
pub fn read(tmp: &TempDir, name: &str) -> String {
    std::fs::read_to_string(tmp.path().join(name))
        .unwrap_or_else(|e| panic!("could not read '{name}': {e}"))
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Stems of all navigable pairs in order.
pub fn pair_stems(index: &PairIndex) -> Vec<&str> {
    index.pairs().iter().map(|p| p.stem.as_str()).collect()
}

// =========================================================================
// Recording display surface
// =========================================================================

/// Display surface that keeps every view and error it receives.
///
/// `buffer` plays the part of the text widget: tests set it to simulate
/// typing, and `show_pair` replaces it the way a real surface would.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub shown: Vec<PairView>,
    pub errors: Vec<String>,
    pub buffer: String,
}

impl RecordingSurface {
    /// The most recent view. Panics if nothing was shown.
    pub fn last(&self) -> &PairView {
        self.shown.last().expect("no pair shown yet")
    }

    /// File name of the most recently shown image.
    pub fn last_image_name(&self) -> String {
        self.last()
            .image
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string()
    }
}

impl DisplaySurface for RecordingSurface {
    fn show_pair(&mut self, view: &PairView) {
        self.buffer = view.caption.clone();
        self.shown.push(view.clone());
    }

    fn edit_buffer(&self) -> String {
        self.buffer.clone()
    }

    fn notify_error(&mut self, error: &SessionError) {
        self.errors.push(error.to_string());
    }
}
