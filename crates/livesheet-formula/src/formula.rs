//! Parsed formula handle

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::{evaluate, CellLookup, FormulaValue};
use crate::parser::parse_formula;
use livesheet_core::Position;
use std::fmt;

/// A parsed formula together with the cells it references
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: FormulaExpr,
    references: Vec<Position>,
}

impl Formula {
    /// Parse an expression (without the leading `=`)
    pub fn parse(expression: &str) -> FormulaResult<Self> {
        Ok(Self::from_ast(parse_formula(expression)?))
    }

    /// Wrap an already built expression
    pub fn from_ast(expr: FormulaExpr) -> Self {
        let mut references = expr.references();
        references.sort_unstable();
        references.dedup();
        Self { expr, references }
    }

    /// Evaluate against the given cell values
    pub fn evaluate(&self, lookup: &dyn CellLookup) -> FormulaValue {
        evaluate(&self.expr, lookup)
    }

    /// Referenced cells, sorted and without duplicates
    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }

    /// Canonical expression text, without the leading `=`
    pub fn expression(&self) -> String {
        self.expr.to_string()
    }

    pub fn ast(&self) -> &FormulaExpr {
        &self.expr
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livesheet_core::{CellError, CellValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_referenced_cells_sorted_and_unique() {
        let formula = Formula::parse("C1 + A2 * C1 - B1 + ZZZZ9").unwrap();
        assert_eq!(
            formula.referenced_cells(),
            &[Position::new(0, 1), Position::new(0, 2), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_expression_is_canonical() {
        let formula = Formula::parse(" ( ( 1 ) + ( A1 ) ) ").unwrap();
        assert_eq!(formula.expression(), "1+A1");
        assert_eq!(formula.to_string(), "1+A1");

        let formula = Formula::parse("A1-(B1-C1)").unwrap();
        assert_eq!(formula.expression(), "A1-(B1-C1)");

        let formula = Formula::parse("ZZZZ1*2").unwrap();
        assert_eq!(formula.expression(), "#REF!*2");
        assert!(formula.referenced_cells().is_empty());
    }

    #[test]
    fn test_evaluate() {
        let formula = Formula::parse("A1/B1").unwrap();
        let lookup = |pos: Position| {
            if pos == Position::new(0, 0) {
                Some(CellValue::Number(1.0))
            } else {
                None
            }
        };
        assert_eq!(formula.evaluate(&lookup), FormulaValue::Error(CellError::Div0));
    }
}
