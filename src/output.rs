//! CLI output formatting.
//!
//! Each display has a `format_*` function that returns lines, so tests can
//! check output without capturing stdout, and a `print_*` wrapper where the
//! binary needs one. Format functions are pure.
//!
//! ## Listing
//!
//! ```text
//! Pairs (3)
//! 001 001-harbor
//!     Image: 001-harbor.png
//!     Caption: 001-harbor.txt
//! 002 002-market
//!     Image: 002-market.png
//!     Caption: (none, will create 002-market.txt)
//!
//! Orphan captions (1)
//! 001 draft
//!     Caption: draft.txt
//! ```
//!
//! ## Pair view
//!
//! ```text
//! 002/003 002-market.png
//!     Image: /data/set/002-market.png (preview 512px)
//!     Caption: (empty)
//! ```

use crate::scan::PairIndex;
use crate::session::PairView;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to the scanned folder, or the full path if outside it.
fn relative(folder: &Path, path: &Path) -> String {
    path.strip_prefix(folder)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Format the pairs, orphans, and skipped duplicates of an index.
pub fn format_listing(index: &PairIndex) -> Vec<String> {
    let folder = index.folder.as_path();
    let mut lines = vec![format!("Pairs ({})", index.len())];

    for (i, pair) in index.pairs().iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), pair.stem));
        if let Some(image) = &pair.image {
            lines.push(format!("{}Image: {}", indent(1), relative(folder, image)));
        }
        match (&pair.caption, pair.caption_target()) {
            (Some(caption), _) => {
                lines.push(format!("{}Caption: {}", indent(1), relative(folder, caption)))
            }
            (None, Some(target)) => lines.push(format!(
                "{}Caption: (none, will create {})",
                indent(1),
                relative(folder, &target)
            )),
            (None, None) => {}
        }
    }

    if !index.orphans().is_empty() {
        lines.push(String::new());
        lines.push(format!("Orphan captions ({})", index.orphans().len()));
        for (i, orphan) in index.orphans().iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), orphan.stem));
            if let Some(caption) = &orphan.caption {
                lines.push(format!("{}Caption: {}", indent(1), relative(folder, caption)));
            }
        }
    }

    if !index.duplicates().is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped duplicates ({})", index.duplicates().len()));
        for path in index.duplicates() {
            lines.push(format!("{}{}", indent(1), relative(folder, path)));
        }
    }

    lines
}

pub fn print_listing(index: &PairIndex) {
    for line in format_listing(index) {
        println!("{}", line);
    }
}

/// Format one pair as shown by the terminal surface.
///
/// Wrap points get a marker so the user knows the next step loops around.
pub fn format_pair_view(view: &PairView) -> Vec<String> {
    let name = view
        .image
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut header = format!(
        "{}/{} {}",
        format_index(view.position + 1),
        format_index(view.count),
        name
    );
    match (view.has_previous, view.has_next) {
        (false, true) => header.push_str("  [first]"),
        (true, false) => header.push_str("  [last]"),
        (false, false) => header.push_str("  [only]"),
        (true, true) => {}
    }

    let mut lines = vec![
        header,
        format!(
            "{}Image: {} (preview {}px)",
            indent(1),
            view.image.display(),
            view.preview_size
        ),
    ];
    lines.extend(format_caption(&view.caption));
    lines
}

/// Format caption text as an indented block.
pub fn format_caption(caption: &str) -> Vec<String> {
    if caption.is_empty() {
        return vec![format!("{}Caption: (empty)", indent(1))];
    }
    let mut lines = vec![format!("{}Caption:", indent(1))];
    for line in caption.lines() {
        lines.push(format!("{}{}", indent(2), line));
    }
    lines
}
