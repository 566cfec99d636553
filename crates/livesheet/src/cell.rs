//! Cell records
//!
//! A cell is one of three kinds, decided once from the text it was set with:
//!
//! | input                          | kind    |
//! |--------------------------------|---------|
//! | `""`                           | Empty   |
//! | `"=<expr>"` (longer than `=`)  | Formula |
//! | anything else                  | Text    |
//!
//! Formula values are computed lazily and cached until invalidated.

use livesheet_core::{CellValue, Position, Result, ESCAPE_SIGN, FORMULA_SIGN};
use livesheet_formula::{CellLookup, Formula};
use std::cell::OnceCell;

/// The kind of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    Text,
    Formula,
}

#[derive(Debug, Clone)]
enum CellContent {
    Empty,
    /// Raw text as entered, escape marker included
    Text(String),
    Formula(Formula),
}

/// A single cell record
#[derive(Debug, Clone)]
pub struct Cell {
    content: CellContent,
    /// Cached formula result
    cache: OnceCell<CellValue>,
}

impl Cell {
    /// An empty cell
    pub fn empty() -> Self {
        Self::with_content(CellContent::Empty)
    }

    /// Classify and build a cell from user input
    ///
    /// Fails with [`Error::FormulaParse`](livesheet_core::Error::FormulaParse)
    /// if the input looks like a formula but does not parse.
    pub fn from_input(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(Self::empty());
        }

        let content = match text.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                CellContent::Formula(Formula::parse(expression)?)
            }
            _ => CellContent::Text(text.to_string()),
        };
        Ok(Self::with_content(content))
    }

    fn with_content(content: CellContent) -> Self {
        Self {
            content,
            cache: OnceCell::new(),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self.content {
            CellContent::Empty => CellKind::Empty,
            CellContent::Text(_) => CellKind::Text,
            CellContent::Formula(_) => CellKind::Formula,
        }
    }

    /// Resolve the value, evaluating the formula if the cache is stale
    pub fn value(&self, lookup: &dyn CellLookup) -> CellValue {
        match &self.content {
            CellContent::Empty => CellValue::Number(0.0),
            CellContent::Text(raw) => {
                let text = raw.strip_prefix(ESCAPE_SIGN).unwrap_or(raw);
                CellValue::string(text)
            }
            CellContent::Formula(formula) => self
                .cache
                .get_or_init(|| formula.evaluate(lookup).into())
                .clone(),
        }
    }

    /// The text the cell displays for editing
    ///
    /// Text cells return their raw input; formulas are re-rendered in
    /// canonical form.
    pub fn text(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text(raw) => raw.clone(),
            CellContent::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula),
        }
    }

    /// Cells named by the formula, sorted and unique
    pub fn referenced_cells(&self) -> &[Position] {
        match &self.content {
            CellContent::Formula(formula) => formula.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => &[],
        }
    }

    /// The parsed formula, for formula cells
    pub fn formula(&self) -> Option<&Formula> {
        match &self.content {
            CellContent::Formula(formula) => Some(formula),
            _ => None,
        }
    }

    /// Whether reading the value needs no evaluation
    pub fn is_cached(&self) -> bool {
        match self.content {
            CellContent::Formula(_) => self.cache.get().is_some(),
            CellContent::Empty | CellContent::Text(_) => true,
        }
    }

    /// Whether the raw text starts with the escape marker
    pub fn is_escaped(&self) -> bool {
        matches!(&self.content, CellContent::Text(raw) if raw.starts_with(ESCAPE_SIGN))
    }

    /// Drop the cached value; returns whether there was one
    pub(crate) fn invalidate_cache(&mut self) -> bool {
        self.cache.take().is_some()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}
