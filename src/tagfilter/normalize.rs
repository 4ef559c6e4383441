//! Canonical rendering of tag filters
//!
//! Operators are written as their keyword in upper case, booleans in lower
//! case, strings double-quoted. Parentheses appear only where an `OR`
//! operand sits under an `AND`.

use super::ast::{Expression, Tag, Value};
use super::mapper::from_wire;
use super::parser::parse;
use crate::error::Result;
use crate::restapi::TagFilter;

const PRECEDENCE_OR: u8 = 1;
const PRECEDENCE_AND: u8 = 2;
const PRECEDENCE_LEAF: u8 = 3;

/// Render an expression in canonical form
pub fn normalize(expression: &Expression) -> String {
    let mut out = String::new();
    render(expression, 0, &mut out);
    out
}

/// Parse and re-render a filter string
pub fn normalize_str(input: &str) -> Result<String> {
    Ok(normalize(&parse(input)?))
}

/// Render a wire tree in canonical form; an empty tree yields `None`
pub fn normalize_wire(filter: &TagFilter) -> Result<Option<String>> {
    Ok(from_wire(filter)?.map(|e| normalize(&e)))
}

fn precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::Or(..) => PRECEDENCE_OR,
        Expression::And(..) => PRECEDENCE_AND,
        Expression::Grouping(inner) => precedence(inner),
        Expression::Comparison(_) | Expression::Unary(_) => PRECEDENCE_LEAF,
    }
}

fn render(expression: &Expression, parent: u8, out: &mut String) {
    if let Expression::Grouping(inner) = expression {
        return render(inner, parent, out);
    }

    let own = precedence(expression);
    let parenthesize = own < parent;
    if parenthesize {
        out.push('(');
    }

    match expression {
        Expression::Or(l, r) => {
            render(l, own, out);
            out.push_str(" OR ");
            render(r, own, out);
        }
        Expression::And(l, r) => {
            render(l, own, out);
            out.push_str(" AND ");
            render(r, own, out);
        }
        Expression::Comparison(c) => {
            render_tag(&c.tag, out);
            out.push(' ');
            out.push_str(c.operator.as_str());
            out.push(' ');
            render_value(&c.value, out);
        }
        Expression::Unary(u) => {
            render_tag(&u.tag, out);
            out.push(' ');
            out.push_str(u.operator.as_str());
        }
        Expression::Grouping(_) => {}
    }

    if parenthesize {
        out.push(')');
    }
}

fn render_tag(tag: &Tag, out: &mut String) {
    out.push_str(&tag.name);
    if let Some(key) = &tag.key {
        out.push(':');
        if is_bare_key(key) {
            out.push_str(key);
        } else {
            push_quoted(key, out);
        }
    }
    if let Some(origin) = tag.origin {
        out.push('@');
        out.push_str(origin.keyword());
    }
}

fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => push_quoted(s, out),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
    }
}

/// Keys that lex back as a single identifier
fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let upper = key.to_ascii_uppercase();
    starts_ok
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '/' | '$'))
        && !matches!(upper.as_str(), "AND" | "OR" | "TRUE" | "FALSE")
        && crate::restapi::TagFilterOperator::from_keyword(&upper).is_none()
}

fn push_quoted(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}
