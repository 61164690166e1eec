//! Filter expression tree and its wire encoding.

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::field::FieldKind;

// ============================================================================
// Operators
// ============================================================================

/// String match types allowed on dimension filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StringMatch {
    Exact,
    Contains,
    BeginsWith,
    EndsWith,
    Regexp,
    FullRegexp,
}

/// Numeric comparisons allowed on metric filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumericOperation {
    GreaterThan,
    LessThan,
    Equal,
}

/// Any predicate operator, before it is checked against a field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    String(StringMatch),
    Numeric(NumericOperation),
}

impl Operator {
    pub const EXACT: Operator = Operator::String(StringMatch::Exact);
    pub const CONTAINS: Operator = Operator::String(StringMatch::Contains);
    pub const BEGINS_WITH: Operator = Operator::String(StringMatch::BeginsWith);
    pub const ENDS_WITH: Operator = Operator::String(StringMatch::EndsWith);
    pub const REGEXP: Operator = Operator::String(StringMatch::Regexp);
    pub const FULL_REGEXP: Operator = Operator::String(StringMatch::FullRegexp);
    pub const GREATER_THAN: Operator = Operator::Numeric(NumericOperation::GreaterThan);
    pub const LESS_THAN: Operator = Operator::Numeric(NumericOperation::LessThan);
    pub const EQUAL: Operator = Operator::Numeric(NumericOperation::Equal);

    /// Wire name of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::String(StringMatch::Exact) => "EXACT",
            Operator::String(StringMatch::Contains) => "CONTAINS",
            Operator::String(StringMatch::BeginsWith) => "BEGINS_WITH",
            Operator::String(StringMatch::EndsWith) => "ENDS_WITH",
            Operator::String(StringMatch::Regexp) => "REGEXP",
            Operator::String(StringMatch::FullRegexp) => "FULL_REGEXP",
            Operator::Numeric(NumericOperation::GreaterThan) => "GREATER_THAN",
            Operator::Numeric(NumericOperation::LessThan) => "LESS_THAN",
            Operator::Numeric(NumericOperation::Equal) => "EQUAL",
        }
    }

    /// The field kind this operator applies to.
    pub fn field_kind(&self) -> FieldKind {
        match self {
            Operator::String(_) => FieldKind::Dimension,
            Operator::Numeric(_) => FieldKind::Metric,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXACT" => Ok(Operator::EXACT),
            "CONTAINS" => Ok(Operator::CONTAINS),
            "BEGINS_WITH" => Ok(Operator::BEGINS_WITH),
            "ENDS_WITH" => Ok(Operator::ENDS_WITH),
            "REGEXP" => Ok(Operator::REGEXP),
            "FULL_REGEXP" => Ok(Operator::FULL_REGEXP),
            "GREATER_THAN" => Ok(Operator::GREATER_THAN),
            "LESS_THAN" => Ok(Operator::LESS_THAN),
            "EQUAL" => Ok(Operator::EQUAL),
            _ => Err(ReportError::unsupported_operator(s, "filter predicate")),
        }
    }
}

impl From<StringMatch> for Operator {
    fn from(m: StringMatch) -> Self {
        Operator::String(m)
    }
}

impl From<NumericOperation> for Operator {
    fn from(op: NumericOperation) -> Self {
        Operator::Numeric(op)
    }
}

/// Logical combinator for filter groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl FromStr for LogicalOperator {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(LogicalOperator::And),
            "OR" => Ok(LogicalOperator::Or),
            _ => Err(ReportError::unsupported_operator(
                s,
                "filter combination (use 'AND' or 'OR')",
            )),
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("AND"),
            LogicalOperator::Or => f.write_str("OR"),
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// Raw predicate value as given by the caller, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl FilterValue {
    /// Render as the string a dimension filter compares against.
    pub fn to_text(&self) -> String {
        match self {
            FilterValue::Text(s) => s.clone(),
            FilterValue::Integer(n) => n.to_string(),
            FilterValue::Float(f) => {
                let mut buffer = ryu::Buffer::new();
                buffer.format(*f).to_string()
            }
        }
    }

    /// Read as the number a metric filter compares against. NaN and the
    /// infinities have no JSON form and read as `None`.
    pub fn to_number(&self) -> Option<f64> {
        let number = match self {
            FilterValue::Text(s) => s.trim().parse().ok(),
            FilterValue::Integer(n) => Some(*n as f64),
            FilterValue::Float(f) => Some(*f),
        };
        number.filter(|n: &f64| n.is_finite())
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Integer(n.into())
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        FilterValue::Integer(n.into())
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Float(f)
    }
}

// ============================================================================
// Tree
// ============================================================================

/// The comparison a predicate performs. The variant fixes the field kind,
/// so a string match can never be attached to a metric or vice versa.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Dimension predicate.
    String {
        match_type: StringMatch,
        value: String,
        case_sensitive: bool,
    },
    /// Metric predicate.
    Numeric { operation: NumericOperation, value: f64 },
}

/// A single-field predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub condition: Condition,
    pub negated: bool,
}

impl Predicate {
    pub fn is_dimension(&self) -> bool {
        matches!(self.condition, Condition::String { .. })
    }

    pub fn field_kind(&self) -> FieldKind {
        if self.is_dimension() {
            FieldKind::Dimension
        } else {
            FieldKind::Metric
        }
    }

    pub fn operator(&self) -> Operator {
        match &self.condition {
            Condition::String { match_type, .. } => Operator::String(*match_type),
            Condition::Numeric { operation, .. } => Operator::Numeric(*operation),
        }
    }

    /// Flip the NOT flag.
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Make a string match case sensitive. No effect on metric predicates.
    pub fn case_sensitive(mut self) -> Self {
        if let Condition::String { case_sensitive, .. } = &mut self.condition {
            *case_sensitive = true;
        }
        self
    }
}

/// A node in a boolean filter tree.
///
/// Groups keep their children in the order given and are never flattened:
/// an `And` nested in an `And` stays nested.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Predicate(Predicate),
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
}

impl FilterNode {
    pub fn as_predicate(&self) -> Option<&Predicate> {
        match self {
            FilterNode::Predicate(p) => Some(p),
            _ => None,
        }
    }

    pub fn children(&self) -> &[FilterNode] {
        match self {
            FilterNode::Predicate(_) => &[],
            FilterNode::And(children) | FilterNode::Or(children) => children,
        }
    }

    /// Number of predicates in the tree.
    pub fn predicate_count(&self) -> usize {
        match self {
            FilterNode::Predicate(_) => 1,
            FilterNode::And(children) | FilterNode::Or(children) => {
                children.iter().map(FilterNode::predicate_count).sum()
            }
        }
    }

    /// Depth of the tree; a lone predicate has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            FilterNode::Predicate(_) => 1,
            FilterNode::And(children) | FilterNode::Or(children) => {
                1 + children.iter().map(FilterNode::depth).max().unwrap_or(0)
            }
        }
    }
}

impl From<Predicate> for FilterNode {
    fn from(p: Predicate) -> Self {
        FilterNode::Predicate(p)
    }
}

// ============================================================================
// Wire encoding
// ============================================================================
//
// Encodes to the Data API `FilterExpression` shape:
//
//   {"filter": {"fieldName": .., "stringFilter": {..}}}
//   {"filter": {"fieldName": .., "numericFilter": {..}}}
//   {"andGroup": {"expressions": [..]}}
//   {"orGroup": {"expressions": [..]}}
//   {"notExpression": {..}}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireFilter<'a> {
    field_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    string_filter: Option<WireStringFilter<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    numeric_filter: Option<WireNumericFilter>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireStringFilter<'a> {
    match_type: StringMatch,
    value: &'a str,
    case_sensitive: bool,
}

#[derive(Serialize)]
struct WireNumericFilter {
    operation: NumericOperation,
    value: WireNumericValue,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireNumericValue {
    double_value: f64,
}

#[derive(Serialize)]
struct WireGroup<'a> {
    expressions: &'a [FilterNode],
}

struct WirePredicate<'a>(&'a Predicate);

impl Serialize for WirePredicate<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let p = self.0;
        let filter = match &p.condition {
            Condition::String {
                match_type,
                value,
                case_sensitive,
            } => WireFilter {
                field_name: &p.field,
                string_filter: Some(WireStringFilter {
                    match_type: *match_type,
                    value,
                    case_sensitive: *case_sensitive,
                }),
                numeric_filter: None,
            },
            Condition::Numeric { operation, value } => WireFilter {
                field_name: &p.field,
                string_filter: None,
                numeric_filter: Some(WireNumericFilter {
                    operation: *operation,
                    value: WireNumericValue {
                        double_value: *value,
                    },
                }),
            },
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("filter", &filter)?;
        map.end()
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.negated {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("notExpression", &WirePredicate(self))?;
            map.end()
        } else {
            WirePredicate(self).serialize(serializer)
        }
    }
}

impl Serialize for FilterNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterNode::Predicate(p) => p.serialize(serializer),
            FilterNode::And(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("andGroup", &WireGroup { expressions: children })?;
                map.end()
            }
            FilterNode::Or(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("orGroup", &WireGroup { expressions: children })?;
                map.end()
            }
        }
    }
}

/// Check that an operator applies to the given field kind.
pub(crate) fn check_operator(
    field: &str,
    operator: Operator,
    kind: FieldKind,
) -> ReportResult<Operator> {
    if operator.field_kind() == kind {
        Ok(operator)
    } else {
        Err(ReportError::unsupported_operator(
            operator.as_str(),
            format!("{kind} field '{field}'"),
        ))
    }
}
