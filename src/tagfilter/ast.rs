//! Tag filter syntax tree

use crate::restapi::TagFilterOperator;
use serde_json::Number;

/// Parsed tag filter expression.
///
/// `And` and `Or` are binary; the parser builds left-associative chains.
/// `Grouping` records explicit parentheses and carries no meaning of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Or(Box<Expression>, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Comparison(Comparison),
    Unary(UnaryOperation),
    Grouping(Box<Expression>),
}

impl Expression {
    /// `left OR right`
    pub fn or(left: Expression, right: Expression) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// `left AND right`
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// `(inner)`
    pub fn grouping(inner: Expression) -> Self {
        Self::Grouping(Box::new(inner))
    }

    /// Comparison of a plain tag against a value
    pub fn comparison(
        name: impl Into<String>,
        operator: TagFilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self::Comparison(Comparison {
            tag: Tag::new(name),
            operator,
            value: value.into(),
        })
    }

    /// Unary check on a plain tag
    pub fn unary(name: impl Into<String>, operator: TagFilterOperator) -> Self {
        Self::Unary(UnaryOperation {
            tag: Tag::new(name),
            operator,
        })
    }

    /// Drop every `Grouping` node
    pub fn without_groupings(self) -> Self {
        match self {
            Expression::Or(l, r) => Expression::or(l.without_groupings(), r.without_groupings()),
            Expression::And(l, r) => Expression::and(l.without_groupings(), r.without_groupings()),
            Expression::Grouping(inner) => inner.without_groupings(),
            leaf => leaf,
        }
    }
}

/// Side of a call a tag is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityOrigin {
    Source,
    Destination,
}

impl EntityOrigin {
    /// Suffix keyword following `@`
    pub fn keyword(self) -> &'static str {
        match self {
            EntityOrigin::Source => "src",
            EntityOrigin::Destination => "dest",
        }
    }
}

/// Left-hand side of a leaf: `name[:key][@origin]`
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub key: Option<String>,
    pub origin: Option<EntityOrigin>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            origin: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_origin(mut self, origin: EntityOrigin) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// `tag OPERATOR value`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub tag: Tag,
    pub operator: TagFilterOperator,
    pub value: Value,
}

/// `tag OPERATOR` for operators without a value
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub tag: Tag,
    pub operator: TagFilterOperator,
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(Number),
    Boolean(bool),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}
