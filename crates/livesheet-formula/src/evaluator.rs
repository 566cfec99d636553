//! Formula evaluator
//!
//! Evaluates formula ASTs against a [`CellLookup`]. Evaluation never fails
//! outright: every problem is reported as a [`CellError`] value.

use crate::ast::{FormulaExpr, UnaryOperator};
use livesheet_core::{CellError, CellValue, Position};

/// Access to the current value of other cells
///
/// Returning `None` means the cell does not exist; it evaluates as `0`.
/// Implementations may compute the value lazily.
pub trait CellLookup {
    fn cell_value(&self, pos: Position) -> Option<CellValue>;
}

impl<F> CellLookup for F
where
    F: Fn(Position) -> Option<CellValue>,
{
    fn cell_value(&self, pos: Position) -> Option<CellValue> {
        self(pos)
    }
}

/// Result of evaluating a formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    Error(CellError),
}

impl FormulaValue {
    /// Get the number, if this is not an error
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) => Some(*n),
            FormulaValue::Error(_) => None,
        }
    }

    /// Get the error category, if this is an error
    pub fn as_error(&self) -> Option<CellError> {
        match self {
            FormulaValue::Error(e) => Some(*e),
            FormulaValue::Number(_) => None,
        }
    }

    /// Non-finite numbers become `#DIV/0!`
    fn checked(n: f64) -> Self {
        if n.is_finite() {
            FormulaValue::Number(n)
        } else {
            FormulaValue::Error(CellError::Div0)
        }
    }
}

impl From<FormulaValue> for CellValue {
    fn from(value: FormulaValue) -> Self {
        match value {
            FormulaValue::Number(n) => CellValue::Number(n),
            FormulaValue::Error(e) => CellValue::Error(e),
        }
    }
}

/// Evaluate an expression
pub fn evaluate(expr: &FormulaExpr, lookup: &dyn CellLookup) -> FormulaValue {
    match expr {
        FormulaExpr::Number(n) => FormulaValue::checked(*n),

        FormulaExpr::Error(e) => FormulaValue::Error(*e),

        FormulaExpr::CellRef(pos) => reference_value(*pos, lookup),

        FormulaExpr::BinaryOp { op, left, right } => {
            let left = match evaluate(left, lookup) {
                FormulaValue::Number(n) => n,
                error => return error,
            };
            let right = match evaluate(right, lookup) {
                FormulaValue::Number(n) => n,
                error => return error,
            };
            FormulaValue::checked(op.apply(left, right))
        }

        FormulaExpr::UnaryOp { op, operand } => match evaluate(operand, lookup) {
            FormulaValue::Number(n) => match op {
                UnaryOperator::Plus => FormulaValue::Number(n),
                UnaryOperator::Negate => FormulaValue::Number(-n),
            },
            error => error,
        },
    }
}

fn reference_value(pos: Position, lookup: &dyn CellLookup) -> FormulaValue {
    if !pos.is_valid() {
        return FormulaValue::Error(CellError::Ref);
    }

    match lookup.cell_value(pos).map(|value| value.to_number()) {
        None => FormulaValue::Number(0.0),
        Some(Ok(n)) => FormulaValue::checked(n),
        Some(Err(e)) => FormulaValue::Error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn eval_with(formula: &str, cells: &[(Position, CellValue)]) -> FormulaValue {
        let cells: HashMap<Position, CellValue> = cells.iter().cloned().collect();
        let lookup = move |pos: Position| cells.get(&pos).cloned();
        let expr = parse_formula(formula).unwrap();
        evaluate(&expr, &lookup)
    }

    fn eval(formula: &str) -> FormulaValue {
        eval_with(formula, &[])
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1+2"), FormulaValue::Number(3.0));
        assert_eq!(eval("10-3"), FormulaValue::Number(7.0));
        assert_eq!(eval("4*5"), FormulaValue::Number(20.0));
        assert_eq!(eval("20/4"), FormulaValue::Number(5.0));
        assert_eq!(eval("2+3*4"), FormulaValue::Number(14.0));
        assert_eq!(eval("(2+3)*4"), FormulaValue::Number(20.0));
        assert_eq!(eval("-(1+2)"), FormulaValue::Number(-3.0));
        assert_eq!(eval("--2"), FormulaValue::Number(2.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1/0"), FormulaValue::Error(CellError::Div0));
        assert_eq!(eval("0/0"), FormulaValue::Error(CellError::Div0));
    }

    #[test]
    fn test_overflow_is_div0() {
        assert_eq!(eval("1e308*10"), FormulaValue::Error(CellError::Div0));
    }

    #[test]
    fn test_references() {
        let a1 = Position::new(0, 0);
        let b1 = Position::new(0, 1);
        let cells = [(a1, CellValue::Number(2.0)), (b1, CellValue::Number(5.0))];
        assert_eq!(eval_with("A1*B1", &cells), FormulaValue::Number(10.0));
        // Missing cells are zero
        assert_eq!(eval_with("A1+C7", &cells), FormulaValue::Number(2.0));
    }

    #[test]
    fn test_text_references() {
        let a1 = Position::new(0, 0);
        let numeric = [(a1, CellValue::string("3.5"))];
        assert_eq!(eval_with("A1*2", &numeric), FormulaValue::Number(7.0));

        let empty = [(a1, CellValue::string(""))];
        assert_eq!(eval_with("A1+1", &empty), FormulaValue::Number(1.0));

        for text in ["abc", " 1", "1 ", "inf", "NaN", "1e999", "1,5"] {
            let cells = [(a1, CellValue::string(text))];
            assert_eq!(
                eval_with("A1+1", &cells),
                FormulaValue::Error(CellError::Value),
                "text {:?}",
                text
            );
        }
    }

    #[test]
    fn test_error_propagation_left_first() {
        let a1 = Position::new(0, 0);
        let b1 = Position::new(0, 1);
        let cells = [
            (a1, CellValue::Error(CellError::Value)),
            (b1, CellValue::Error(CellError::Div0)),
        ];
        assert_eq!(
            eval_with("A1+B1", &cells),
            FormulaValue::Error(CellError::Value)
        );
        assert_eq!(
            eval_with("B1+A1", &cells),
            FormulaValue::Error(CellError::Div0)
        );
        assert_eq!(
            eval_with("-A1", &cells),
            FormulaValue::Error(CellError::Value)
        );
    }

    #[test]
    fn test_out_of_range_reference() {
        assert_eq!(eval("ZZZZ1+1"), FormulaValue::Error(CellError::Ref));
        assert_eq!(eval("#REF!"), FormulaValue::Error(CellError::Ref));

        let far = FormulaExpr::CellRef(Position::new(u32::MAX, 0));
        let lookup = |_pos: Position| Some(CellValue::Number(1.0));
        assert_eq!(evaluate(&far, &lookup), FormulaValue::Error(CellError::Ref));
    }

    #[test]
    fn test_formula_value_into_cell_value() {
        assert_eq!(
            CellValue::from(FormulaValue::Number(1.5)),
            CellValue::Number(1.5)
        );
        assert_eq!(
            CellValue::from(FormulaValue::Error(CellError::Ref)),
            CellValue::Error(CellError::Ref)
        );
    }
}
