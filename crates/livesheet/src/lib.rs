//! # livesheet
//!
//! The reactive core of a spreadsheet.
//!
//! A [`Sheet`] holds cells keyed by [`Position`]. Each cell is empty, literal
//! text, or a formula over other cells. Formula results are computed on
//! first read and cached; editing a cell drops the caches of every cell that
//! depends on it, directly or transitively, so the next read recomputes.
//!
//! ## Features
//!
//! - Arithmetic formulas (`+ - * /`, unary signs, parentheses, cell references)
//! - Error values (`#REF!`, `#VALUE!`, `#DIV/0!`) that propagate through formulas
//! - Circular references rejected at edit time, leaving the sheet untouched
//! - Tab separated printing of values or texts
//!
//! ## Example
//!
//! ```rust
//! use livesheet::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! let a1: Position = "A1".parse().unwrap();
//! let b1: Position = "B1".parse().unwrap();
//!
//! sheet.set_cell(a1, "'hello").unwrap();
//! sheet.set_cell(b1, "=(1+2)*3").unwrap();
//!
//! assert_eq!(sheet.value(a1).unwrap(), CellValue::string("hello"));
//! assert_eq!(sheet.text(b1).unwrap(), "=(1+2)*3");
//! assert_eq!(sheet.values_to_string(), "hello\t9\n");
//!
//! // A1 cannot refer to B1 if B1 refers to A1
//! sheet.set_cell(b1, "=A1").unwrap();
//! let err = sheet.set_cell(a1, "=B1").unwrap_err();
//! assert!(err.is_circular_dependency());
//! ```

pub mod cell;
pub mod cycle;
pub mod dependency;
pub mod invalidation;
pub mod options;
pub mod prelude;
pub mod sheet;

pub use cell::{Cell, CellKind};
pub use dependency::DependencyGraph;
pub use options::SheetOptions;
pub use sheet::{CellView, Sheet};

// Re-export core types
pub use livesheet_core::{
    CellError, CellValue, Error, Position, Result, Size, ESCAPE_SIGN, FORMULA_SIGN, MAX_COLS,
    MAX_ROWS,
};

// Re-export formula types
pub use livesheet_formula::{
    parse_formula, CellLookup, Formula, FormulaError, FormulaExpr, FormulaResult, FormulaValue,
    MAX_DEPTH,
};
