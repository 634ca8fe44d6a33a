//! # caption-deck
//!
//! Step through a folder of PNG images and edit the plain-text caption that
//! sits next to each one. Built for hand-curating image/caption datasets:
//! one image, one `.txt`, same stem.
//!
//! # Architecture
//!
//! ```text
//! folder  →  scan  →  PairIndex  →  Session  ⇄  DisplaySurface
//!                                     │
//!                          Navigation + CaptionStore
//! ```
//!
//! The session owns all state. A display surface (the terminal front end in
//! this crate, or any GUI that implements [`session::DisplaySurface`]) only
//! shows what it is given and hands back the edit buffer when asked.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Lists a folder and pairs images with captions by stem |
//! | [`navigation`] | Wrap-around position over the pairs |
//! | [`caption`] | Loads and saves caption text under a normalization policy |
//! | [`session`] | Save-then-move-then-load state machine and the surface traits |
//! | [`config`] | Optional per-folder `caption-deck.toml` |
//! | [`output`] | CLI output formatting |
//! | [`terminal`] | Line-oriented terminal surface and command loop |
//!
//! # Design Decisions
//!
//! ## Pairing by Stem
//!
//! Images and captions are matched by file stem, not by their position in
//! two sorted lists. A folder with one missing caption would otherwise pair
//! every later image with the wrong text. An image with no caption is still
//! navigable and shows empty text.
//!
//! ## Edits Are Saved on Leaving
//!
//! Nothing is written while typing. The buffer is saved when the user moves
//! to another pair, opens another folder, or quits. A failed save keeps the
//! user on the same pair with the text intact instead of losing it.
//!
//! ## One Normalization Policy per Folder
//!
//! Load and save always apply the same [`caption::Normalization`], so a
//! caption loads back the way it was saved. The default trims trailing
//! whitespace on load; folders that need byte-exact captions set
//! `normalization = "raw"`.

pub mod caption;
pub mod config;
pub mod navigation;
pub mod output;
pub mod scan;
pub mod session;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_helpers;
