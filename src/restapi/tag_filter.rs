//! Tag filter wire tree
//!
//! Filters travel as a recursive tree of `EXPRESSION` nodes (a logical
//! operator over ordered children) and `TAG_FILTER` leaves.

use serde::{Deserialize, Serialize};

/// Logical connective of an `EXPRESSION` node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

/// Side of a call a tag is evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagFilterEntity {
    Destination,
    Source,
    NotApplicable,
}

/// Comparison and unary operators of a `TAG_FILTER` leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagFilterOperator {
    Equals,
    NotEqual,
    Contains,
    NotContain,
    StartsWith,
    EndsWith,
    NotStartsWith,
    NotEndsWith,
    GreaterOrEqualThan,
    LessOrEqualThan,
    GreaterThan,
    LessThan,
    IsEmpty,
    NotEmpty,
    IsBlank,
    NotBlank,
}

impl TagFilterOperator {
    /// Binary operators, in keyword order
    pub const COMPARISONS: [TagFilterOperator; 12] = [
        TagFilterOperator::Equals,
        TagFilterOperator::NotEqual,
        TagFilterOperator::Contains,
        TagFilterOperator::NotContain,
        TagFilterOperator::StartsWith,
        TagFilterOperator::EndsWith,
        TagFilterOperator::NotStartsWith,
        TagFilterOperator::NotEndsWith,
        TagFilterOperator::GreaterOrEqualThan,
        TagFilterOperator::LessOrEqualThan,
        TagFilterOperator::GreaterThan,
        TagFilterOperator::LessThan,
    ];

    /// Operators that take no value
    pub const UNARY: [TagFilterOperator; 4] = [
        TagFilterOperator::IsEmpty,
        TagFilterOperator::NotEmpty,
        TagFilterOperator::IsBlank,
        TagFilterOperator::NotBlank,
    ];

    /// Canonical keyword, identical to the wire name
    pub fn as_str(self) -> &'static str {
        match self {
            TagFilterOperator::Equals => "EQUALS",
            TagFilterOperator::NotEqual => "NOT_EQUAL",
            TagFilterOperator::Contains => "CONTAINS",
            TagFilterOperator::NotContain => "NOT_CONTAIN",
            TagFilterOperator::StartsWith => "STARTS_WITH",
            TagFilterOperator::EndsWith => "ENDS_WITH",
            TagFilterOperator::NotStartsWith => "NOT_STARTS_WITH",
            TagFilterOperator::NotEndsWith => "NOT_ENDS_WITH",
            TagFilterOperator::GreaterOrEqualThan => "GREATER_OR_EQUAL_THAN",
            TagFilterOperator::LessOrEqualThan => "LESS_OR_EQUAL_THAN",
            TagFilterOperator::GreaterThan => "GREATER_THAN",
            TagFilterOperator::LessThan => "LESS_THAN",
            TagFilterOperator::IsEmpty => "IS_EMPTY",
            TagFilterOperator::NotEmpty => "NOT_EMPTY",
            TagFilterOperator::IsBlank => "IS_BLANK",
            TagFilterOperator::NotBlank => "NOT_BLANK",
        }
    }

    /// Resolve a keyword (case-insensitive) or a symbolic alias
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let upper = keyword.to_ascii_uppercase();
        let op = match upper.as_str() {
            "EQUALS" | "==" => TagFilterOperator::Equals,
            "NOT_EQUAL" | "NOT_EQUALS" | "!=" => TagFilterOperator::NotEqual,
            "CONTAINS" => TagFilterOperator::Contains,
            "NOT_CONTAIN" | "NOT_CONTAINS" => TagFilterOperator::NotContain,
            "STARTS_WITH" => TagFilterOperator::StartsWith,
            "ENDS_WITH" => TagFilterOperator::EndsWith,
            "NOT_STARTS_WITH" => TagFilterOperator::NotStartsWith,
            "NOT_ENDS_WITH" => TagFilterOperator::NotEndsWith,
            "GREATER_OR_EQUAL_THAN" | ">=" => TagFilterOperator::GreaterOrEqualThan,
            "LESS_OR_EQUAL_THAN" | "<=" => TagFilterOperator::LessOrEqualThan,
            "GREATER_THAN" | ">" => TagFilterOperator::GreaterThan,
            "LESS_THAN" | "<" => TagFilterOperator::LessThan,
            "IS_EMPTY" => TagFilterOperator::IsEmpty,
            "NOT_EMPTY" => TagFilterOperator::NotEmpty,
            "IS_BLANK" => TagFilterOperator::IsBlank,
            "NOT_BLANK" => TagFilterOperator::NotBlank,
            _ => return None,
        };
        Some(op)
    }

    /// Whether the operator takes no value
    pub fn is_unary(self) -> bool {
        Self::UNARY.contains(&self)
    }
}

impl std::fmt::Display for TagFilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node of the wire tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TagFilter {
    /// Logical operator over ordered children
    #[serde(rename = "EXPRESSION")]
    Expression {
        #[serde(rename = "logicalOperator")]
        logical_operator: LogicalOperator,
        #[serde(default)]
        elements: Vec<TagFilter>,
    },
    /// Comparison leaf
    #[serde(rename = "TAG_FILTER")]
    Tag(TagFilterElement),
}

impl TagFilter {
    /// Build an `EXPRESSION` node
    pub fn expression(logical_operator: LogicalOperator, elements: Vec<TagFilter>) -> Self {
        Self::Expression {
            logical_operator,
            elements,
        }
    }
}

/// `TAG_FILTER` leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagFilterElement {
    pub name: String,
    pub operator: TagFilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<TagFilterEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_value: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TagFilterElement {
    /// Leaf without a value
    pub fn new(name: impl Into<String>, operator: TagFilterOperator) -> Self {
        Self {
            name: name.into(),
            operator,
            entity: None,
            string_value: None,
            number_value: None,
            boolean_value: None,
            key: None,
            value: None,
        }
    }
}
