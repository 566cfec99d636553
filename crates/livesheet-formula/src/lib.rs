//! # livesheet-formula
//!
//! Formula service for livesheet.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Canonical re-rendering (AST → text)
//! - Formula evaluation (AST → number or error) against a [`CellLookup`]
//! - The referenced-cell list the sheet uses for dependency tracking
//!
//! ## Example
//!
//! ```rust
//! use livesheet_core::{CellValue, Position};
//! use livesheet_formula::{Formula, FormulaValue};
//!
//! let formula = Formula::parse("(A1 + 2) * 3").unwrap();
//! assert_eq!(formula.expression(), "(A1+2)*3");
//! assert_eq!(formula.referenced_cells(), &[Position::new(0, 0)]);
//!
//! let lookup = |_pos: Position| Some(CellValue::Number(4.0));
//! assert_eq!(formula.evaluate(&lookup), FormulaValue::Number(18.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, CellLookup, FormulaValue};
pub use formula::Formula;
pub use parser::{parse_formula, MAX_DEPTH};
