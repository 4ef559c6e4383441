//! Tag filter tokenizer
//!
//! Converts the input string into tokens annotated with their byte offsets.

use crate::error::{Error, Result};
use crate::restapi::TagFilterOperator;
use std::iter::Peekable;
use std::str::CharIndices;

/// A token of the filter language
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Dotted identifier; also used for keys and origins
    Identifier(String),
    /// Quoted string with escapes resolved
    StringLiteral(String),
    /// Integer or decimal literal, as written
    Number(String),
    /// `true` or `false`
    Boolean(bool),
    /// Comparison or unary operator, keyword or symbol
    Operator(TagFilterOperator),
    And,
    Or,
    LeftParen,
    RightParen,
    Colon,
    At,
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Identifier(s) => write!(f, "identifier '{s}'"),
            Token::StringLiteral(s) => write!(f, "string '{s}'"),
            Token::Number(n) => write!(f, "number {n}"),
            Token::Boolean(b) => write!(f, "boolean {b}"),
            Token::Operator(op) => write!(f, "operator {op}"),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
            Token::Colon => f.write_str("':'"),
            Token::At => f.write_str("'@'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// Token with the byte offset it starts at
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Tokenizer over one filter string
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// All tokens of the input, terminated by `Eof`
    pub fn tokenize(mut self) -> Result<Vec<Spanned>> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Next token of the input
    pub fn next_token(&mut self) -> Result<Spanned> {
        self.skip_whitespace();

        let Some(&(offset, ch)) = self.chars.peek() else {
            return Ok(Spanned {
                token: Token::Eof,
                offset: self.input.len(),
            });
        };

        let token = match ch {
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            ':' => self.single(Token::Colon),
            '@' => self.single(Token::At),
            '=' | '!' | '<' | '>' => self.read_symbol(offset, ch)?,
            '\'' | '"' => self.read_string(offset, ch)?,
            c if c.is_ascii_digit() => self.read_number(offset),
            '-' if self.next_is_digit() => self.read_number(offset),
            c if c.is_alphabetic() || c == '_' => self.read_word(offset),
            other => {
                return Err(Error::tag_filter(
                    offset,
                    format!("unexpected character '{other}'"),
                ))
            }
        };

        Ok(Spanned { token, offset })
    }

    fn single(&mut self, token: Token) -> Token {
        self.chars.next();
        token
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn next_is_digit(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        matches!(ahead.peek(), Some((_, c)) if c.is_ascii_digit())
    }

    fn end_offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len())
    }

    fn read_symbol(&mut self, offset: usize, first: char) -> Result<Token> {
        self.chars.next();
        let with_equals = self.chars.next_if(|(_, c)| *c == '=').is_some();
        let symbol = match (first, with_equals) {
            ('=', true) => "==",
            ('!', true) => "!=",
            ('<', true) => "<=",
            ('>', true) => ">=",
            ('<', false) => "<",
            ('>', false) => ">",
            _ => {
                return Err(Error::tag_filter(
                    offset,
                    format!("unexpected character '{first}'"),
                ))
            }
        };
        TagFilterOperator::from_keyword(symbol)
            .map(Token::Operator)
            .ok_or_else(|| Error::tag_filter(offset, format!("unknown operator '{symbol}'")))
    }

    fn read_string(&mut self, offset: usize, quote: char) -> Result<Token> {
        self.chars.next();
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => return Ok(Token::StringLiteral(value)),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, c)) => value.push(c),
                    None => break,
                },
                Some((_, c)) => value.push(c),
                None => break,
            }
        }
        Err(Error::tag_filter(offset, "unterminated string literal"))
    }

    fn read_number(&mut self, offset: usize) -> Token {
        self.chars.next_if(|(_, c)| *c == '-');
        while self.chars.next_if(|(_, c)| c.is_ascii_digit()).is_some() {}

        let mut ahead = self.chars.clone();
        if matches!(ahead.next(), Some((_, '.')))
            && matches!(ahead.peek(), Some((_, c)) if c.is_ascii_digit())
        {
            self.chars.next();
            while self.chars.next_if(|(_, c)| c.is_ascii_digit()).is_some() {}
        }

        // exponent, as rendered for values beyond the i64 range
        let mut ahead = self.chars.clone();
        if matches!(ahead.next(), Some((_, 'e' | 'E'))) {
            ahead.next_if(|(_, c)| matches!(c, '+' | '-'));
            if matches!(ahead.peek(), Some((_, c)) if c.is_ascii_digit()) {
                self.chars = ahead;
                while self.chars.next_if(|(_, c)| c.is_ascii_digit()).is_some() {}
            }
        }

        let end = self.end_offset();
        Token::Number(self.input[offset..end].to_string())
    }

    fn read_word(&mut self, offset: usize) -> Token {
        while self
            .chars
            .next_if(|(_, c)| c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '/' | '$'))
            .is_some()
        {}

        let end = self.end_offset();
        let word = &self.input[offset..end];
        match word.to_ascii_uppercase().as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "TRUE" => Token::Boolean(true),
            "FALSE" => Token::Boolean(false),
            upper => match TagFilterOperator::from_keyword(upper) {
                Some(op) => Token::Operator(op),
                None => Token::Identifier(word.to_string()),
            },
        }
    }
}
