//! Tokenizer for screening filter expressions.
//!
//! Produces a flat token list terminated by `EndOfInput`. Identifiers are
//! lowercased; `and`/`or` in any case become boolean tokens.

use crate::domain::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Identifier,
    Operator,
    And,
    Or,
    LeftParen,
    RightParen,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /// Byte offset of the first character.
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// Lexeme for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            _ => format!("'{}'", self.lexeme),
        }
    }
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.remaining().chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    // Digits and dots are taken greedily; "1.2.3" is rejected by the parser
    // when it converts the lexeme.
    fn lex_number(&mut self) -> Token {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Number, &self.input[start..self.pos], start)
    }

    fn lex_word(&mut self) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let word = self.input[start..self.pos].to_ascii_lowercase();
        let kind = match word.as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, word, start)
    }

    fn lex_operator(&mut self, first: char) -> Result<Token, ParseError> {
        let start = self.pos;
        self.advance();
        let followed_by_eq = self.peek() == Some('=');
        let lexeme = match first {
            '<' | '>' if followed_by_eq => {
                self.advance();
                if first == '<' { "<=" } else { ">=" }
            }
            '<' => "<",
            '>' => ">",
            '=' => "=",
            '!' if followed_by_eq => {
                self.advance();
                "!="
            }
            _ => {
                return Err(ParseError::new("expected '=' after '!'", start));
            }
        };
        Ok(Token::new(TokenKind::Operator, lexeme, start))
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenKind::EndOfInput, "", start)),
        };

        match ch {
            c if c.is_ascii_digit() || c == '.' => Ok(self.lex_number()),
            '-' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => Ok(self.lex_number()),
            c if c.is_ascii_alphabetic() => Ok(self.lex_word()),
            '<' | '>' | '=' | '!' => self.lex_operator(ch),
            '(' => {
                self.advance();
                Ok(Token::new(TokenKind::LeftParen, "(", start))
            }
            ')' => {
                self.advance();
                Ok(Token::new(TokenKind::RightParen, ")", start))
            }
            other => Err(ParseError::new(
                format!("unexpected character '{}'", other),
                start,
            )),
        }
    }
}

/// Split `input` into tokens, always ending with an `EndOfInput` token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::EndOfInput;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
