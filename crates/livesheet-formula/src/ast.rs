//! Formula Abstract Syntax Tree types
//!
//! The [`fmt::Display`] implementation is the canonical printer: it emits the
//! fewest parentheses that still re-parse to the same tree.

use livesheet_core::{CellError, Position};
use std::fmt;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal (always finite and non-negative; signs are unary operators)
    Number(f64),
    /// Error literal, also produced for references outside the sheet limits
    Error(CellError),

    // === References ===
    /// Single cell reference
    CellRef(Position),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    /// Apply the operator to two numbers
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => left / right,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
}

impl UnaryOperator {
    pub fn symbol(self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Negate => '-',
        }
    }
}

impl FormulaExpr {
    /// Build a binary node
    pub fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> Self {
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build a unary node
    pub fn unary(op: UnaryOperator, operand: FormulaExpr) -> Self {
        FormulaExpr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Every cell reference in the expression, in left-to-right order,
    /// duplicates included
    pub fn references(&self) -> Vec<Position> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                FormulaExpr::CellRef(pos) => out.push(*pos),
                FormulaExpr::BinaryOp { left, right, .. } => {
                    // Right first so the left operand is visited first.
                    stack.push(right);
                    stack.push(left);
                }
                FormulaExpr::UnaryOp { operand, .. } => stack.push(operand),
                FormulaExpr::Number(_) | FormulaExpr::Error(_) => {}
            }
        }
        out
    }

    fn binary_precedence(&self) -> Option<u8> {
        match self {
            FormulaExpr::BinaryOp { op, .. } => Some(op.precedence()),
            _ => None,
        }
    }
}

struct Parenthesized<'a>(&'a FormulaExpr, bool);

impl fmt::Display for Parenthesized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Number(n) => write!(f, "{}", n),
            FormulaExpr::Error(e) => write!(f, "{}", e),
            FormulaExpr::CellRef(pos) => write!(f, "{}", pos),
            FormulaExpr::BinaryOp { op, left, right } => {
                let prec = op.precedence();
                // Operators are left-associative, so a right operand of equal
                // precedence keeps its parentheses.
                let left_parens = left.binary_precedence().map_or(false, |p| p < prec);
                let right_parens = right.binary_precedence().map_or(false, |p| p <= prec);
                write!(
                    f,
                    "{}{}{}",
                    Parenthesized(left, left_parens),
                    op.symbol(),
                    Parenthesized(right, right_parens)
                )
            }
            FormulaExpr::UnaryOp { op, operand } => {
                let parens = operand.binary_precedence().is_some();
                write!(f, "{}{}", op.symbol(), Parenthesized(operand, parens))
            }
        }
    }
}
