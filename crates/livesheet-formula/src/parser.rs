//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with proper operator
//! precedence. The input is the expression text *without* the leading `=`.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use livesheet_core::{CellError, Position};

/// Parse an expression string into an AST
///
/// # Example
/// ```rust
/// use livesheet_formula::parse_formula;
///
/// let ast = parse_formula("1+2").unwrap();
/// let ast = parse_formula("(A1 + B2) / 2").unwrap();
/// assert!(parse_formula("1+").is_err());
/// ```
pub fn parse_formula(expression: &str) -> FormulaResult<FormulaExpr> {
    let mut parser = FormulaParser::new(expression)?;
    let (expr, _depth) = parser.parse_expression()?;

    // Make sure we consumed all input
    if *parser.current_token() != Token::Eof {
        return Err(FormulaError::TrailingInput(
            parser.input[parser.token_start..].to_string(),
        ));
    }

    Ok(expr)
}

/// Deepest expression tree the parser builds
///
/// Evaluating, printing and dropping a tree all recurse once per level, so
/// longer operator chains and deeper nesting are rejected up front.
pub const MAX_DEPTH: usize = 256;

/// An expression and the depth of its tree
type Parsed = (FormulaExpr, usize);

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals
    Number(f64),
    Error(CellError),

    // References
    CellRef(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,

    // Delimiters
    LeftParen,
    RightParen,

    // End of input
    Eof,
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    /// Byte offset where the current token begins
    token_start: usize,
    current_token: Token,
    /// Open parentheses and unary operators around the current position
    nesting: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current_token: Token::Eof,
            nesting: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        // Single-character tokens
        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Error literal (#REF!, #VALUE!, #DIV/0!)
        if c == '#' {
            return self.scan_error();
        }

        // Cell reference
        if c.is_ascii_alphabetic() {
            return self.scan_reference();
        }

        Err(FormulaError::UnexpectedCharacter {
            ch: c,
            offset: self.pos,
        })
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        let num: f64 = num_str
            .parse()
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", num_str)))?;
        if !num.is_finite() {
            return Err(FormulaError::Parse(format!(
                "Number '{}' is out of range",
                num_str
            )));
        }
        Ok(Token::Number(num))
    }

    fn scan_error(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        self.advance(); // Skip '#'
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '!' || c == '/')
        {
            self.advance();
        }

        let error_str = &self.input[start..self.pos];
        CellError::from_literal(error_str)
            .map(Token::Error)
            .ok_or_else(|| FormulaError::Parse(format!("Unknown error literal '{}'", error_str)))
    }

    fn scan_reference(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric())
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        if Self::is_cell_reference(text) {
            Ok(Token::CellRef(text.to_string()))
        } else {
            Err(FormulaError::Parse(format!("Unknown identifier '{}'", text)))
        }
    }

    /// Uppercase letters followed by digits, nothing else
    fn is_cell_reference(text: &str) -> bool {
        let letters = text.bytes().take_while(|b| b.is_ascii_uppercase()).count();
        let digits = &text[letters..];
        letters > 0 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else if *self.current_token() == Token::Eof {
            Err(FormulaError::UnexpectedEnd)
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: numbers, references, error literals, parentheses

    fn parse_expression(&mut self) -> FormulaResult<Parsed> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<Parsed> {
        let (mut left, mut depth) = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let (right, right_depth) = self.parse_multiplicative()?;
            depth = Self::check_depth(depth.max(right_depth) + 1)?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok((left, depth))
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Parsed> {
        let (mut left, mut depth) = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let (right, right_depth) = self.parse_unary()?;
            depth = Self::check_depth(depth.max(right_depth) + 1)?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok((left, depth))
    }

    fn parse_unary(&mut self) -> FormulaResult<Parsed> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume()?;
        let (operand, depth) = self.nested(Self::parse_unary)?;
        Ok((FormulaExpr::unary(op, operand), Self::check_depth(depth + 1)?))
    }

    fn parse_primary(&mut self) -> FormulaResult<Parsed> {
        match self.consume()? {
            Token::Number(n) => Ok((FormulaExpr::Number(n), 1)),

            Token::Error(e) => Ok((FormulaExpr::Error(e), 1)),

            Token::CellRef(ref_str) => Ok((Self::cell_reference(&ref_str), 1)),

            Token::LeftParen => {
                let parsed = self.nested(Self::parse_expression)?;
                self.expect(&Token::RightParen)?;
                Ok(parsed)
            }

            Token::Eof => Err(FormulaError::UnexpectedEnd),

            token => Err(FormulaError::Parse(format!(
                "Unexpected token: {:?}",
                token
            ))),
        }
    }

    /// Run `parse` one level deeper in the parser's own recursion
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> FormulaResult<Parsed>,
    ) -> FormulaResult<Parsed> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(Self::too_deep());
        }
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    fn check_depth(depth: usize) -> FormulaResult<usize> {
        if depth > MAX_DEPTH {
            Err(Self::too_deep())
        } else {
            Ok(depth)
        }
    }

    fn too_deep() -> FormulaError {
        FormulaError::Parse(format!(
            "Formula is nested more than {} levels deep",
            MAX_DEPTH
        ))
    }

    /// References outside the sheet limits are kept as `#REF!` so that the
    /// formula still parses and evaluates to the reference error.
    fn cell_reference(ref_str: &str) -> FormulaExpr {
        match Position::parse(ref_str) {
            Ok(pos) => FormulaExpr::CellRef(pos),
            Err(_) => FormulaExpr::Error(CellError::Ref),
        }
    }
}
