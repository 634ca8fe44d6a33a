//! The editing session: one folder, one current pair, one edit buffer.
//!
//! [`Session`] ties the [`PairIndex`], [`Navigation`] and [`CaptionStore`]
//! together and talks to the outside world through two traits:
//!
//! - [`DisplaySurface`] shows pairs, owns the edit buffer, and receives
//!   error notifications.
//! - [`DirectoryPicker`] asks the user for a folder.
//!
//! ## Save, move, load
//!
//! Every step runs in the same order:
//!
//! ```text
//! go_next / go_previous
//!   1. save the edit buffer to the outgoing pair's caption
//!   2. move (wrapping at either end)
//!   3. load the incoming pair's caption from disk
//!   4. show the incoming pair
//! ```
//!
//! If step 1 fails the session stays where it is. The surface is told about
//! the error and keeps its buffer, so the user's text survives and the move
//! can be retried.

use crate::caption::{CaptionError, CaptionStore, SaveOutcome};
use crate::config::{self, ConfigError, DisplayConfig, CONFIG_FILE};
use crate::navigation::Navigation;
use crate::scan::{PairIndex, PairRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Caption(#[from] CaptionError),
    #[error("invalid config {}: {source}", path.display())]
    Config { path: PathBuf, source: ConfigError },
    #[error(
        "caption {} could not be read, so it was not replaced; clear the text to move on without saving",
        path.display()
    )]
    UnreadableCaption { path: PathBuf },
}

/// Everything a surface needs to display one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairView {
    pub image: PathBuf,
    /// Caption as loaded from disk, after normalization.
    pub caption: String,
    pub position: usize,
    pub count: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// Longest edge to scale the preview image to (`display.preview_size`).
    pub preview_size: u32,
}

/// Where pairs are shown and captions are edited.
pub trait DisplaySurface {
    /// Display a pair and replace the edit buffer with its caption.
    fn show_pair(&mut self, view: &PairView);

    /// Current contents of the edit buffer.
    fn edit_buffer(&self) -> String;

    /// Report a recoverable failure. The edit buffer must be left alone.
    fn notify_error(&mut self, error: &SessionError);
}

/// Asks the user for a folder. `None` means the user cancelled.
pub trait DirectoryPicker {
    fn pick_directory(&mut self) -> Option<PathBuf>;
}

pub struct Session<S> {
    surface: S,
    index: PairIndex,
    navigation: Navigation,
    store: CaptionStore,
    display: DisplayConfig,
    // Caption of the current pair failed to load. It is never written back;
    // typed text blocks leaving the pair until the buffer is cleared.
    unreadable: bool,
}

impl<S: DisplaySurface> Session<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            index: PairIndex::default(),
            navigation: Navigation::new(),
            store: CaptionStore::default(),
            display: DisplayConfig::default(),
            unreadable: false,
        }
    }

    /// Ask `picker` for a folder and open it. Cancelling does nothing.
    pub fn open_folder(&mut self, picker: &mut impl DirectoryPicker) -> Result<bool, SessionError> {
        match picker.pick_directory() {
            Some(dir) => self.open_folder_at(&dir),
            None => {
                debug!("folder selection cancelled");
                Ok(false)
            }
        }
    }

    /// Open a folder given at startup. A path that does not exist is ignored.
    pub fn open_folder_from_argument(&mut self, path: &Path) -> Result<bool, SessionError> {
        if !path.exists() {
            debug!(path = %path.display(), "startup folder does not exist, ignoring");
            return Ok(false);
        }
        self.open_folder_at(path)
    }

    /// Scan `dir` and show its first pair.
    ///
    /// Returns `Ok(false)` and leaves the session untouched when the folder
    /// has no images. Before switching, the current buffer is saved to the
    /// pair being left, exactly as a step would.
    pub fn open_folder_at(&mut self, dir: &Path) -> Result<bool, SessionError> {
        let index = PairIndex::open(dir);
        if index.is_empty() {
            info!(dir = %dir.display(), "no images in folder, keeping current session");
            return Ok(false);
        }

        let config = match config::load_config(dir) {
            Ok(config) => config,
            Err(source) => {
                let error = SessionError::Config {
                    path: dir.join(CONFIG_FILE),
                    source,
                };
                return Err(self.report(error));
            }
        };

        self.commit()?;

        info!(
            dir = %dir.display(),
            pairs = index.len(),
            orphans = index.orphans().len(),
            "opened folder"
        );
        self.store = config.caption_store();
        self.display = config.display;
        self.navigation.reset(index.len());
        self.index = index;
        self.show_current();
        Ok(true)
    }

    /// Save, step back (wrapping to the last pair), and show.
    pub fn go_previous(&mut self) -> Result<(), SessionError> {
        self.step(Navigation::retreat)
    }

    /// Save, step forward (wrapping to the first pair), and show.
    pub fn go_next(&mut self) -> Result<(), SessionError> {
        self.step(Navigation::advance)
    }

    fn step(&mut self, move_to: fn(&mut Navigation)) -> Result<(), SessionError> {
        if self.navigation.is_empty() {
            return Ok(());
        }
        self.commit()?;
        move_to(&mut self.navigation);
        self.show_current();
        Ok(())
    }

    /// Save the edit buffer to the current pair's caption without moving.
    pub fn commit(&mut self) -> Result<SaveOutcome, SessionError> {
        let Some(position) = self.navigation.position() else {
            return Ok(SaveOutcome::Skipped);
        };
        let text = self.surface.edit_buffer();
        if self.unreadable {
            if text.trim().is_empty() {
                debug!(position, "caption was unreadable and buffer is blank, leaving file alone");
                return Ok(SaveOutcome::Skipped);
            }
            let path = self
                .index
                .get(position)
                .and_then(|record| record.caption_target())
                .unwrap_or_default();
            warn!(position, "typed over an unreadable caption, staying on current pair");
            return Err(self.report(SessionError::UnreadableCaption { path }));
        }

        match self.store.save(&self.index, position, &text) {
            Ok(outcome) => {
                if let SaveOutcome::Written(path) = &outcome {
                    self.index.attach_caption(position, path.clone());
                }
                Ok(outcome)
            }
            Err(err) => {
                warn!(%err, position, "caption not saved, staying on current pair");
                Err(self.report(err.into()))
            }
        }
    }

    fn report(&mut self, error: SessionError) -> SessionError {
        self.surface.notify_error(&error);
        error
    }

    fn show_current(&mut self) {
        let Some(position) = self.navigation.position() else {
            return;
        };
        let Some(image) = self.index.get(position).and_then(|r| r.image.clone()) else {
            return;
        };

        let caption = match self.store.load(&self.index, position) {
            Ok(text) => {
                self.unreadable = false;
                text
            }
            Err(err) => {
                warn!(%err, position, "caption could not be loaded");
                self.unreadable = true;
                self.report(err.into());
                String::new()
            }
        };

        let view = PairView {
            image,
            caption,
            position,
            count: self.navigation.len(),
            has_previous: self.navigation.has_previous(),
            has_next: self.navigation.has_next(),
            preview_size: self.display.preview_size,
        };
        self.surface.show_pair(&view);
    }

    /// The pair currently shown, if a folder is loaded.
    pub fn current_pair(&self) -> Option<&PairRecord> {
        self.navigation
            .position()
            .and_then(|position| self.index.get(position))
    }

    pub fn position(&self) -> Option<usize> {
        self.navigation.position()
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn index(&self) -> &PairIndex {
        &self.index
    }

    pub fn caption_store(&self) -> &CaptionStore {
        &self.store
    }

    pub fn display_config(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
