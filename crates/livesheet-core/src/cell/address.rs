//! Cell position and sheet size types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell position (e.g., "A1")
///
/// Positions are zero-based internally and rendered in A1 notation (column
/// letters A, B, ..., Z, AA, ... followed by a one-based row number).
/// Ordering is row-major: rows compare first, then columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ...)
    pub col: u16,
}

impl Position {
    /// Create a new position. The result is not checked against the sheet
    /// limits; use [`Position::is_valid`] for that.
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Check that the position lies within [`MAX_ROWS`] x [`MAX_COLS`]
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse a position from A1-style notation
    ///
    /// Column letters must be uppercase. The row number is one-based.
    ///
    /// # Examples
    /// ```
    /// use livesheet_core::Position;
    ///
    /// let pos = Position::parse("A1").unwrap();
    /// assert_eq!(pos.row, 0);
    /// assert_eq!(pos.col, 0);
    ///
    /// let pos = Position::parse("AB12").unwrap();
    /// assert_eq!(pos.row, 11);
    /// assert_eq!(pos.col, 27);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let split = s
            .find(|c: char| !c.is_ascii_uppercase())
            .unwrap_or(s.len());
        if split == 0 {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let (letters, digits) = s.split_at(split);
        let col = Self::letters_to_column(letters)?;

        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        // Overlong digit strings overflow u32; they are out of range either way.
        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("row number out of range in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        let pos = Self::new(row - 1, col);
        if !pos.is_valid() {
            return Err(Error::InvalidAddress(format!(
                "'{}' is outside the sheet limits",
                s
            )));
        }

        Ok(pos)
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_uppercase() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                return Err(Error::InvalidAddress(format!(
                    "column '{}' is outside the sheet limits",
                    letters
                )));
            }
        }

        Ok((col - 1) as u16)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row as u64 + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Printable extent of a sheet: the smallest rectangle anchored at A1 that
/// covers every non-empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub rows: u32,
    pub cols: u16,
}

impl Size {
    pub const fn new(rows: u32, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Whether the extent covers no cells at all
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Grow the extent so that it covers `pos`
    pub fn include(&mut self, pos: Position) {
        self.rows = self.rows.max(pos.row + 1);
        self.cols = self.cols.max(pos.col + 1);
    }

    /// Whether `pos` lies on the last row or the last column of the extent
    pub fn is_on_edge(&self, pos: Position) -> bool {
        pos.row + 1 == self.rows || pos.col + 1 == self.cols
    }
}
