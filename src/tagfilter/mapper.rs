//! Conversion between expressions and the wire tree
//!
//! Chains of the same logical operator become one `EXPRESSION` node with
//! all operands as ordered children. Parenthesized sub-expressions keep
//! their own node.

use super::ast::{Comparison, EntityOrigin, Expression, Tag, UnaryOperation, Value};
use crate::error::{Error, Result};
use crate::restapi::{LogicalOperator, TagFilter, TagFilterElement, TagFilterEntity};

// ============================================================================
// Expression -> wire
// ============================================================================

/// Lower an expression into the wire tree
pub fn to_wire(expression: &Expression) -> TagFilter {
    match expression {
        Expression::Or(..) => {
            let mut elements = Vec::new();
            collect_operands(expression, LogicalOperator::Or, &mut elements);
            TagFilter::expression(LogicalOperator::Or, elements)
        }
        Expression::And(..) => {
            let mut elements = Vec::new();
            collect_operands(expression, LogicalOperator::And, &mut elements);
            TagFilter::expression(LogicalOperator::And, elements)
        }
        Expression::Grouping(inner) => to_wire(inner),
        Expression::Comparison(comparison) => TagFilter::Tag(comparison_to_wire(comparison)),
        Expression::Unary(unary) => TagFilter::Tag(unary_to_wire(unary)),
    }
}

fn collect_operands(expression: &Expression, operator: LogicalOperator, out: &mut Vec<TagFilter>) {
    match (expression, operator) {
        (Expression::Or(l, r), LogicalOperator::Or) | (Expression::And(l, r), LogicalOperator::And) => {
            collect_operands(l, operator, out);
            collect_operands(r, operator, out);
        }
        (other, _) => out.push(to_wire(other)),
    }
}

fn element_for(tag: &Tag, operator: crate::restapi::TagFilterOperator) -> TagFilterElement {
    let mut element = TagFilterElement::new(tag.name.clone(), operator);
    element.key = tag.key.clone();
    element.entity = Some(match tag.origin {
        Some(EntityOrigin::Destination) => TagFilterEntity::Destination,
        Some(EntityOrigin::Source) => TagFilterEntity::Source,
        None => TagFilterEntity::NotApplicable,
    });
    element
}

fn comparison_to_wire(comparison: &Comparison) -> TagFilterElement {
    let mut element = element_for(&comparison.tag, comparison.operator);
    match &comparison.value {
        Value::String(s) => {
            element.string_value = Some(s.clone());
            element.value = Some(s.clone());
        }
        Value::Number(n) => {
            element.number_value = Some(n.clone());
            if element.key.is_some() {
                element.value = Some(n.to_string());
            }
        }
        Value::Boolean(b) => {
            element.boolean_value = Some(*b);
            if element.key.is_some() {
                element.value = Some(b.to_string());
            }
        }
    }
    element
}

fn unary_to_wire(unary: &UnaryOperation) -> TagFilterElement {
    element_for(&unary.tag, unary.operator)
}

// ============================================================================
// Wire -> expression
// ============================================================================

/// Raise a wire tree into an expression; an empty tree yields `None`
pub fn from_wire(filter: &TagFilter) -> Result<Option<Expression>> {
    match filter {
        TagFilter::Tag(element) => element_from_wire(element).map(Some),
        TagFilter::Expression {
            logical_operator,
            elements,
        } => {
            let mut result: Option<Expression> = None;
            for child in elements {
                let Some(operand) = from_wire(child)? else {
                    continue;
                };
                let operand = group_if_nested(child, operand, *logical_operator);
                result = Some(match result {
                    None => operand,
                    Some(left) => match logical_operator {
                        LogicalOperator::And => Expression::and(left, operand),
                        LogicalOperator::Or => Expression::or(left, operand),
                    },
                });
            }
            Ok(result)
        }
    }
}

/// Parse a raw wire document and raise it
pub fn from_wire_value(value: &serde_json::Value) -> Result<Option<Expression>> {
    let filter: TagFilter = serde_json::from_value(value.clone())
        .map_err(|e| Error::malformed(format!("invalid tag filter expression: {e}")))?;
    from_wire(&filter)
}

/// Nested nodes that a flat chain would not reproduce keep their parentheses
fn group_if_nested(child: &TagFilter, operand: Expression, parent: LogicalOperator) -> Expression {
    let needs_group = match child {
        TagFilter::Expression {
            logical_operator,
            elements,
        } if elements.len() > 1 => *logical_operator == parent || parent == LogicalOperator::And,
        _ => false,
    };
    if needs_group {
        Expression::grouping(operand)
    } else {
        operand
    }
}

fn element_from_wire(element: &TagFilterElement) -> Result<Expression> {
    let mut tag = Tag::new(element.name.clone());
    tag.key = element.key.clone();
    tag.origin = match element.entity {
        Some(TagFilterEntity::Destination) => Some(EntityOrigin::Destination),
        Some(TagFilterEntity::Source) => Some(EntityOrigin::Source),
        Some(TagFilterEntity::NotApplicable) | None => None,
    };

    if element.operator.is_unary() {
        return Ok(Expression::Unary(UnaryOperation {
            tag,
            operator: element.operator,
        }));
    }

    let value = if let Some(n) = &element.number_value {
        Value::Number(n.clone())
    } else if let Some(b) = element.boolean_value {
        Value::Boolean(b)
    } else if let Some(s) = element.string_value.as_ref().or(element.value.as_ref()) {
        Value::String(s.clone())
    } else {
        return Err(Error::malformed(format!(
            "tag filter on '{}' with operator {} has no value",
            element.name, element.operator
        )));
    };

    Ok(Expression::Comparison(Comparison {
        tag,
        operator: element.operator,
        value,
    }))
}
