//! Recursive descent parser for tag filters
//!
//! ```text
//! expression := or
//! or         := and ( OR and )*
//! and        := primary ( AND primary )*
//! primary    := '(' expression ')' | tag operator value?
//! tag        := IDENT ( ':' key )? ( '@' origin )?
//! value      := STRING | NUMBER | BOOLEAN
//! ```
//!
//! Parsing stops at the first error; the error carries the byte offset of
//! the offending token.

use super::ast::{Comparison, EntityOrigin, Expression, Tag, UnaryOperation, Value};
use super::lexer::{Lexer, Spanned, Token};
use crate::error::{Error, Result};
use serde_json::Number;

/// Parse a filter string into an expression
pub fn parse(input: &str) -> Result<Expression> {
    Parser::new(Lexer::new(input).tokenize()?).parse_all()
}

static EOF: Token = Token::Eof;

struct Parser {
    tokens: Vec<Spanned>,
    position: usize,
}

impl Parser {
    fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn parse_all(mut self) -> Result<Expression> {
        if self.check(&Token::Eof) {
            return Err(self.error("expected a tag filter expression"));
        }
        let expression = self.parse_or()?;
        if !self.check(&Token::Eof) {
            return Err(self.error(format!("unexpected {}", self.current())));
        }
        Ok(expression)
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;
        while self.match_token(&Token::Or) {
            let right = self.parse_and()?;
            left = Expression::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_primary()?;
        while self.match_token(&Token::And) {
            let right = self.parse_primary()?;
            left = Expression::and(left, right);
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        if self.match_token(&Token::LeftParen) {
            let inner = self.parse_or()?;
            if !self.match_token(&Token::RightParen) {
                return Err(self.error(format!("expected ')', found {}", self.current())));
            }
            return Ok(Expression::grouping(inner));
        }

        let tag = self.parse_tag()?;

        let operator = match self.current() {
            Token::Operator(op) => *op,
            other => return Err(self.error(format!("expected an operator, found {other}"))),
        };
        self.advance();

        if operator.is_unary() {
            return Ok(Expression::Unary(UnaryOperation { tag, operator }));
        }

        let value = self.parse_value()?;
        Ok(Expression::Comparison(Comparison {
            tag,
            operator,
            value,
        }))
    }

    fn parse_tag(&mut self) -> Result<Tag> {
        let name = match self.current() {
            Token::Identifier(name) => name.clone(),
            other => return Err(self.error(format!("expected a tag name, found {other}"))),
        };
        self.advance();
        let mut tag = Tag::new(name);

        if self.match_token(&Token::Colon) {
            let key = match self.current() {
                Token::Identifier(k) | Token::StringLiteral(k) | Token::Number(k) => k.clone(),
                other => return Err(self.error(format!("expected a tag key, found {other}"))),
            };
            self.advance();
            tag.key = Some(key);
        }

        if self.match_token(&Token::At) {
            let origin = match self.current() {
                Token::Identifier(origin) => match origin.to_ascii_lowercase().as_str() {
                    "src" => Some(EntityOrigin::Source),
                    "dest" => Some(EntityOrigin::Destination),
                    "na" => None,
                    _ => {
                        return Err(self.error(format!(
                            "unknown entity origin '{origin}', expected src, dest or na"
                        )))
                    }
                },
                other => return Err(self.error(format!("expected an entity origin, found {other}"))),
            };
            self.advance();
            tag.origin = origin;
        }

        Ok(tag)
    }

    fn parse_value(&mut self) -> Result<Value> {
        let value = match self.current() {
            Token::StringLiteral(s) => Value::String(s.clone()),
            Token::Boolean(b) => Value::Boolean(*b),
            Token::Number(raw) => Value::Number(self.parse_number(raw)?),
            other => return Err(self.error(format!("expected a value, found {other}"))),
        };
        self.advance();
        Ok(value)
    }

    fn parse_number(&self, raw: &str) -> Result<Number> {
        if let Ok(i) = raw.parse::<i64>() {
            return Ok(Number::from(i));
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .ok_or_else(|| self.error(format!("invalid number '{raw}'")))
    }

    fn current(&self) -> &Token {
        self.tokens
            .get(self.position)
            .map(|s| &s.token)
            .unwrap_or(&EOF)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map(|s| s.offset)
            .unwrap_or(0)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == token
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::tag_filter(self.offset(), message)
    }
}
