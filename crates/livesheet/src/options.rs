//! Sheet configuration

use livesheet_core::{Position, MAX_COLS, MAX_ROWS};

/// Options for a [`Sheet`](crate::Sheet)
///
/// The extent can only be narrowed below [`MAX_ROWS`] x [`MAX_COLS`]; larger
/// values are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetOptions {
    /// Number of addressable rows (default: [`MAX_ROWS`])
    pub max_rows: u32,
    /// Number of addressable columns (default: [`MAX_COLS`])
    pub max_cols: u16,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            max_rows: MAX_ROWS,
            max_cols: MAX_COLS,
        }
    }
}

impl SheetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of addressable rows
    pub fn with_max_rows(mut self, rows: u32) -> Self {
        self.max_rows = rows.min(MAX_ROWS);
        self
    }

    /// Set the number of addressable columns
    pub fn with_max_cols(mut self, cols: u16) -> Self {
        self.max_cols = cols.min(MAX_COLS);
        self
    }

    /// Whether `pos` lies inside the configured extent
    pub fn contains(&self, pos: Position) -> bool {
        // Fields are public, so clamp here as well.
        pos.row < self.max_rows.min(MAX_ROWS) && pos.col < self.max_cols.min(MAX_COLS)
    }
}
