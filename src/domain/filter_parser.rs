//! Filter expression parser.
//!
//! Recursive descent over the token stream:
//!
//! ```text
//! expression := comparison ( (AND | OR) comparison )*
//! comparison := IDENTIFIER OPERATOR NUMBER
//! ```
//!
//! `and` and `or` have equal precedence and fold left to right, so
//! `a > 1 and b > 2 or c > 3` is `((a > 1 and b > 2) or c > 3)`.

use crate::domain::error::ParseError;
use crate::domain::filter::{CompareOp, Expr};
use crate::domain::filter_lexer::{tokenize, Token, TokenKind};

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        // tokenize() always ends with EndOfInput and we never advance past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::EndOfInput {
            self.pos += 1;
        }
        token
    }

    fn error(token: &Token, expected: &str) -> ParseError {
        ParseError::new(
            format!("expected {}, found {}", expected, token.describe()),
            token.position,
        )
    }

    fn parse_field(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Identifier => Ok(Expr::Field(token.lexeme)),
            _ => Err(Self::error(&token, "field name")),
        }
    }

    fn parse_operator(&mut self, field: &Expr) -> Result<CompareOp, ParseError> {
        let token = self.advance();
        let op = match token.kind {
            TokenKind::Operator => CompareOp::from_symbol(&token.lexeme),
            _ => None,
        };
        op.ok_or_else(|| Self::error(&token, &format!("comparison operator after '{}'", field)))
    }

    fn parse_value(&mut self, op: CompareOp) -> Result<Expr, ParseError> {
        let token = self.advance();
        if token.kind != TokenKind::Number {
            return Err(Self::error(
                &token,
                &format!("number after '{}'", op.symbol()),
            ));
        }
        token
            .lexeme
            .parse::<f64>()
            .map(Expr::Number)
            .map_err(|_| ParseError::new(format!("invalid number: {}", token.lexeme), token.position))
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_field()?;
        let op = self.parse_operator(&left)?;
        let right = self.parse_value(op)?;
        Ok(Expr::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_comparison()?;
        loop {
            match self.peek().kind {
                TokenKind::And => {
                    self.advance();
                    expr = Expr::and(expr, self.parse_comparison()?);
                }
                TokenKind::Or => {
                    self.advance();
                    expr = Expr::or(expr, self.parse_comparison()?);
                }
                TokenKind::EndOfInput => return Ok(expr),
                _ => return Err(Self::error(self.peek(), "'and', 'or' or end of input")),
            }
        }
    }
}

/// Parse a non-empty filter expression into a tree.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    Parser::new(tokens).parse_expression()
}
