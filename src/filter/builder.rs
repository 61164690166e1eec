//! Constructors for filter trees.

use crate::error::{ReportError, ReportResult};
use crate::field::FieldKind;

use super::expr::{
    check_operator, Condition, FilterNode, FilterValue, LogicalOperator, NumericOperation,
    Operator, Predicate, StringMatch,
};

/// Build a single-field predicate.
///
/// Dimension predicates accept the string match operators and coerce `value`
/// to a string. Metric predicates accept the numeric comparisons and coerce
/// `value` to `f64`. `negate` sets the predicate's NOT flag.
///
/// # Errors
///
/// - [`ReportError::UnsupportedOperator`] if the operator does not apply to
///   the chosen field kind.
/// - [`ReportError::InvalidFilterValue`] if a metric value is not numeric.
pub fn make_predicate(
    field: impl Into<String>,
    operator: impl Into<Operator>,
    value: impl Into<FilterValue>,
    is_dimension: bool,
    negate: bool,
) -> ReportResult<FilterNode> {
    let field = field.into();
    let value = value.into();
    let kind = if is_dimension {
        FieldKind::Dimension
    } else {
        FieldKind::Metric
    };

    let condition = match check_operator(&field, operator.into(), kind)? {
        Operator::String(match_type) => Condition::String {
            match_type,
            value: value.to_text(),
            case_sensitive: false,
        },
        Operator::Numeric(operation) => {
            let number = value
                .to_number()
                .ok_or_else(|| ReportError::InvalidFilterValue {
                    field: field.clone(),
                    value: value.to_text(),
                })?;
            Condition::Numeric {
                operation,
                value: number,
            }
        }
    };

    Ok(FilterNode::Predicate(Predicate {
        field,
        condition,
        negated: negate,
    }))
}

/// Combine filters under one logical group.
///
/// A single node is returned unchanged. Nested groups of the same kind are
/// kept nested.
///
/// # Errors
///
/// Returns [`ReportError::EmptyInput`] if `nodes` is empty.
pub fn combine(nodes: Vec<FilterNode>, operator: LogicalOperator) -> ReportResult<FilterNode> {
    let mut nodes = nodes;
    match nodes.len() {
        0 => Err(ReportError::EmptyInput),
        1 => Ok(nodes.remove(0)),
        _ => Ok(match operator {
            LogicalOperator::And => FilterNode::And(nodes),
            LogicalOperator::Or => FilterNode::Or(nodes),
        }),
    }
}

/// AND-combine filters.
pub fn all_of(nodes: Vec<FilterNode>) -> ReportResult<FilterNode> {
    combine(nodes, LogicalOperator::And)
}

/// OR-combine filters.
pub fn any_of(nodes: Vec<FilterNode>) -> ReportResult<FilterNode> {
    combine(nodes, LogicalOperator::Or)
}

/// Dimension predicate with a typed match; cannot fail.
pub fn dimension(
    field: impl Into<String>,
    match_type: StringMatch,
    value: impl Into<String>,
) -> Predicate {
    Predicate {
        field: field.into(),
        condition: Condition::String {
            match_type,
            value: value.into(),
            case_sensitive: false,
        },
        negated: false,
    }
}

/// Metric predicate with a typed comparison.
///
/// # Errors
///
/// Returns [`ReportError::InvalidFilterValue`] if `value` is NaN or infinite.
pub fn metric(
    field: impl Into<String>,
    operation: NumericOperation,
    value: f64,
) -> ReportResult<Predicate> {
    let field = field.into();
    if !value.is_finite() {
        return Err(ReportError::InvalidFilterValue {
            field,
            value: value.to_string(),
        });
    }
    Ok(Predicate {
        field,
        condition: Condition::Numeric { operation, value },
        negated: false,
    })
}
