//! Tag filter expression language
//!
//! Users write tag filters as strings; the API stores them as a tree of
//! `EXPRESSION` and `TAG_FILTER` nodes.
//!
//! # Syntax
//!
//! - Leaves: `name[:key][@src|@dest|@na] OPERATOR value` or
//!   `name[:key][@origin] UNARY_OPERATOR`
//! - Operators: `EQUALS`, `NOT_EQUAL`, `CONTAINS`, `NOT_CONTAIN`,
//!   `STARTS_WITH`, `ENDS_WITH`, `NOT_STARTS_WITH`, `NOT_ENDS_WITH`,
//!   `GREATER_OR_EQUAL_THAN`, `LESS_OR_EQUAL_THAN`, `GREATER_THAN`,
//!   `LESS_THAN`, plus the symbols `==`, `!=`, `>=`, `<=`, `>`, `<`
//! - Unary operators: `IS_EMPTY`, `NOT_EMPTY`, `IS_BLANK`, `NOT_BLANK`
//! - Values: single- or double-quoted strings, numbers, `true`/`false`
//! - `AND` binds tighter than `OR`; parentheses group
//!
//! Keywords are case-insensitive. [`normalize`] renders the one canonical
//! form that is written back into state.
//!
//! # Example
//!
//! ```rust
//! use instana_provider::tagfilter::{normalize_str, parse, to_wire};
//!
//! let expr = parse("entity.type equals 'host' and agent.zone not_empty").unwrap();
//! let wire = to_wire(&expr);
//! assert_eq!(
//!     normalize_str("entity.type equals 'host' and agent.zone not_empty").unwrap(),
//!     r#"entity.type EQUALS "host" AND agent.zone NOT_EMPTY"#
//! );
//! # let _ = wire;
//! ```

mod ast;
mod lexer;
mod mapper;
mod normalize;
mod parser;

pub use ast::{Comparison, EntityOrigin, Expression, Tag, UnaryOperation, Value};
pub use lexer::{Lexer, Spanned, Token};
pub use mapper::{from_wire, from_wire_value, to_wire};
pub use normalize::{normalize, normalize_str, normalize_wire};
pub use parser::parse;
