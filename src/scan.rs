//! Folder scanning and image/caption pairing.
//!
//! A caption folder is flat: every `.png` is an image, every `.txt` is a
//! caption, and everything else is ignored. Extensions match case-insensitively.
//!
//! ```text
//! dataset/
//! ├── 0001.png          # image
//! ├── 0001.txt          # its caption
//! ├── 0002.png          # image with no caption yet
//! ├── notes.txt         # caption with no image (orphan)
//! └── caption-deck.toml # optional config, ignored by the scan
//! ```
//!
//! ## Two views of the same listing
//!
//! [`scan`] returns the raw listing: two independently sorted lists, one per
//! extension. Older caption tools paired these by position, which silently
//! misaligns as soon as one image lacks a caption.
//!
//! [`PairIndex`] is what the rest of the crate navigates. It groups the
//! listing by file stem so `0002.png` pairs with `0002.txt` or with nothing,
//! never with whatever caption happens to sort into the same slot.
//!
//! ## Failure model
//!
//! Scanning never fails. A missing or unreadable directory yields an empty
//! listing, and unreadable entries are skipped.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const IMAGE_EXTENSION: &str = "png";
pub const CAPTION_EXTENSION: &str = "txt";

/// Raw result of listing a folder: images and captions, each sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanListing {
    pub images: Vec<PathBuf>,
    pub captions: Vec<PathBuf>,
}

/// List the `.png` and `.txt` files directly inside `dir`.
///
/// Not recursive. Each list is sorted ascending by the full path string, so
/// the result does not depend on the order the filesystem returns entries in.
pub fn scan(dir: &Path) -> ScanListing {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), %err, "folder not listable, treating as empty");
            return ScanListing::default();
        }
    };

    let mut listing = ScanListing::default();
    for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
        if !path.is_file() {
            continue;
        }
        if has_extension(&path, IMAGE_EXTENSION) {
            listing.images.push(path);
        } else if has_extension(&path, CAPTION_EXTENSION) {
            listing.captions.push(path);
        }
    }

    listing.images.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    listing.captions.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    debug!(
        dir = %dir.display(),
        images = listing.images.len(),
        captions = listing.captions.len(),
        "scanned folder"
    );
    listing
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// An image and its caption, matched by file stem.
///
/// Either side may be missing: an image nobody has captioned yet, or a
/// caption whose image was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairRecord {
    pub stem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<PathBuf>,
}

impl PairRecord {
    /// Where this record's caption lives, or would be created.
    ///
    /// For an uncaptioned image this is the image path with a `.txt`
    /// extension. `None` only for a record with neither side, which the
    /// index never produces.
    pub fn caption_target(&self) -> Option<PathBuf> {
        self.caption.clone().or_else(|| {
            self.image
                .as_ref()
                .map(|image| image.with_extension(CAPTION_EXTENSION))
        })
    }
}

/// Stem-keyed index over a scanned folder.
///
/// `pairs` holds every record that has an image, ordered by stem. These are
/// the navigable positions. Caption-only records go to `orphans`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PairIndex {
    pub folder: PathBuf,
    pairs: Vec<PairRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    orphans: Vec<PairRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    duplicates: Vec<PathBuf>,
}

impl PairIndex {
    /// Scan `dir` and build the index in one step.
    pub fn open(dir: &Path) -> Self {
        Self::build(dir, scan(dir))
    }

    /// Group a raw listing by stem.
    ///
    /// When two files of the same kind share a stem (`a.png` and `a.PNG`)
    /// the first in sorted order is kept and the others are recorded as
    /// duplicates.
    pub fn build(folder: &Path, listing: ScanListing) -> Self {
        let mut by_stem: BTreeMap<String, PairRecord> = BTreeMap::new();
        let mut duplicates = Vec::new();

        for image in listing.images {
            let record = entry(&mut by_stem, &image);
            if record.image.is_some() {
                duplicates.push(image);
            } else {
                record.image = Some(image);
            }
        }
        for caption in listing.captions {
            let record = entry(&mut by_stem, &caption);
            if record.caption.is_some() {
                duplicates.push(caption);
            } else {
                record.caption = Some(caption);
            }
        }

        let (pairs, orphans): (Vec<_>, Vec<_>) =
            by_stem.into_values().partition(|r| r.image.is_some());

        if !orphans.is_empty() {
            warn!(count = orphans.len(), "captions without a matching image");
        }
        if !duplicates.is_empty() {
            warn!(count = duplicates.len(), "files sharing a stem were skipped");
        }

        Self {
            folder: folder.to_path_buf(),
            pairs,
            orphans,
            duplicates,
        }
    }

    /// Number of navigable pairs (one per image).
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pair at `position`, or `None` when out of range.
    pub fn get(&self, position: usize) -> Option<&PairRecord> {
        self.pairs.get(position)
    }

    pub fn pairs(&self) -> &[PairRecord] {
        &self.pairs
    }

    pub fn orphans(&self) -> &[PairRecord] {
        &self.orphans
    }

    pub fn duplicates(&self) -> &[PathBuf] {
        &self.duplicates
    }

    /// Record that a caption file now exists for the pair at `position`.
    pub(crate) fn attach_caption(&mut self, position: usize, caption: PathBuf) {
        if let Some(record) = self.pairs.get_mut(position) {
            record.caption = Some(caption);
        }
    }
}

fn entry<'a>(by_stem: &'a mut BTreeMap<String, PairRecord>, path: &Path) -> &'a mut PairRecord {
    let stem = stem_of(path);
    by_stem.entry(stem.clone()).or_insert_with(|| PairRecord {
        stem,
        image: None,
        caption: None,
    })
}
