//! # livesheet-core
//!
//! Core data types for the livesheet reactive spreadsheet engine.
//!
//! This crate provides the fundamental types shared by the formula service and
//! the sheet:
//! - [`Position`] and [`Size`] - Cell coordinates and printable extents
//! - [`CellValue`] - The value a cell resolves to (number, text or error)
//! - [`CellError`] - Error categories surfaced as values (`#REF!`, `#VALUE!`, `#DIV/0!`)
//! - [`Error`] - Structural failures of the sheet API
//!
//! ## Example
//!
//! ```rust
//! use livesheet_core::{CellValue, Position};
//!
//! let pos: Position = "B3".parse().unwrap();
//! assert_eq!(pos, Position::new(2, 1));
//! assert_eq!(pos.to_string(), "B3");
//!
//! assert_eq!(CellValue::from(1.5).to_string(), "1.5");
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{CellError, CellValue, Position, Size};
pub use error::{Error, Result};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 16_384;

/// Maximum number of columns in a sheet
pub const MAX_COLS: u16 = 16_384;

/// Leading character that marks cell input as a formula
pub const FORMULA_SIGN: char = '=';

/// Leading character that forces cell input to be read as literal text
pub const ESCAPE_SIGN: char = '\'';
