//! Cell value types

use std::fmt;

/// The value a cell resolves to
///
/// Empty cells resolve to `Number(0.0)`, so there is no separate empty variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Numeric value
    Number(f64),

    /// Text value (escape marker already stripped)
    String(String),

    /// Error value (#REF!, #VALUE!, #DIV/0!)
    Error(CellError),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the value is an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the error category if this is one
    pub fn as_error(&self) -> Option<CellError> {
        match self {
            CellValue::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Numeric reading of the value, as arithmetic sees it
    ///
    /// Text counts only when the whole string is a finite decimal number;
    /// empty text is zero. Other text is [`CellError::Value`], and errors
    /// are returned as they are.
    pub fn to_number(&self) -> Result<f64, CellError> {
        match self {
            CellValue::Number(n) => Ok(*n),
            CellValue::String(s) => parse_number_text(s).ok_or(CellError::Value),
            CellValue::Error(e) => Err(*e),
        }
    }
}

fn parse_number_text(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(0.0);
    }

    // Rules out "inf", "NaN" and friends that `f64::from_str` accepts.
    let first = s.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '+' | '-' | '.')) {
        return None;
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }

    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Number(0.0)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Error categories produced by formula evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #REF! - Reference to a cell outside the sheet
    Ref,
    /// #VALUE! - Operand is not a number
    Value,
    /// #DIV/0! - Division by zero or arithmetic overflow
    Div0,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Ref => "#REF!",
            CellError::Value => "#VALUE!",
            CellError::Div0 => "#DIV/0!",
        }
    }

    /// Recognize an error literal, ignoring case
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal.to_ascii_uppercase().as_str() {
            "#REF!" => Some(CellError::Ref),
            "#VALUE!" => Some(CellError::Value),
            "#DIV/0!" => Some(CellError::Div0),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
