//! Position tracking over a folder of pairs.
//!
//! Navigation always wraps: stepping past the last pair lands on the first
//! and stepping back from the first lands on the last. There is no terminal
//! state, so moves never fail. With no pairs loaded every move is a no-op.
//!
//! `has_previous` / `has_next` answer a different question: whether a step
//! stays inside the list without wrapping. Display surfaces use them to show
//! where in the folder the user is, not to block moves.

/// Current position over `count` pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    current: usize,
    count: usize,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over at the first of `count` pairs.
    ///
    /// A count of zero leaves the navigation inactive.
    pub fn reset(&mut self, count: usize) {
        self.current = 0;
        self.count = count;
    }

    /// Step forward, wrapping from the last pair to the first.
    pub fn advance(&mut self) {
        if self.count == 0 {
            return;
        }
        self.current = if self.current + 1 < self.count {
            self.current + 1
        } else {
            0
        };
    }

    /// Step back, wrapping from the first pair to the last.
    pub fn retreat(&mut self) {
        if self.count == 0 {
            return;
        }
        self.current = if self.current > 0 {
            self.current - 1
        } else {
            self.count - 1
        };
    }

    /// Current position, or `None` when nothing is loaded.
    pub fn position(&self) -> Option<usize> {
        (self.count > 0).then_some(self.current)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether a pair exists before the current one without wrapping.
    pub fn has_previous(&self) -> bool {
        self.count > 0 && self.current > 0
    }

    /// Whether a pair exists after the current one without wrapping.
    pub fn has_next(&self) -> bool {
        self.count > 0 && self.current + 1 < self.count
    }
}
