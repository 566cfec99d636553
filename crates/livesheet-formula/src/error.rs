//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while parsing a formula
///
/// Evaluation never fails: problems found while evaluating are reported as
/// error values (`#REF!`, `#VALUE!`, `#DIV/0!`) instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input ended where an operand or ')' was required
    #[error("Unexpected end of formula")]
    UnexpectedEnd,

    /// Character that cannot start any token
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    /// A complete expression was followed by more input
    #[error("Unexpected characters after expression: '{0}'")]
    TrailingInput(String),
}

impl From<FormulaError> for livesheet_core::Error {
    fn from(err: FormulaError) -> Self {
        livesheet_core::Error::FormulaParse(err.to_string())
    }
}
