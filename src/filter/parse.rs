//! Text form of a predicate, used by the command line.
//!
//! ```text
//! [!]<field> <OPERATOR> <value>
//! ```
//!
//! The field and operator are separated by whitespace; everything after the
//! operator is the value, so values may contain spaces. A leading `!`
//! negates the predicate.

use crate::error::{ReportError, ReportResult};

use super::builder::make_predicate;
use super::expr::{FilterNode, Operator};

/// Parse a predicate such as `!pagePath CONTAINS /payment-method`.
pub fn parse_predicate(input: &str, is_dimension: bool) -> ReportResult<FilterNode> {
    let trimmed = input.trim();
    let (negate, rest) = match trimmed.strip_prefix('!') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    let malformed = || ReportError::invalid_text(input, "'[!]<field> <OPERATOR> <value>'");

    let (field, rest) = rest.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let (operator, value) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(malformed)?;
    let value = value.trim();
    if field.is_empty() || value.is_empty() {
        return Err(malformed());
    }

    let operator: Operator = operator.parse()?;
    make_predicate(field, operator, value, is_dimension, negate)
}
