//! Boolean filter expressions over dimension and metric fields.
//!
//! Filters are trees of [`FilterNode`]s: single-field predicates combined
//! with AND/OR groups. Dimension predicates use string matching, metric
//! predicates use numeric comparison; the kind is fixed by [`Condition`].
//!
//! # Example
//!
//! ```
//! use ga4_reports::filter::{combine, make_predicate, LogicalOperator, Operator};
//!
//! let not_payment =
//!     make_predicate("pagePath", Operator::CONTAINS, "/payment-method", true, true)?;
//! let page_views = make_predicate("eventName", Operator::EXACT, "page_view", true, false)?;
//! let filter = combine(vec![not_payment, page_views], LogicalOperator::And)?;
//! assert_eq!(filter.predicate_count(), 2);
//! # Ok::<(), ga4_reports::ReportError>(())
//! ```

mod builder;
mod expr;
mod parse;

pub use builder::{all_of, any_of, combine, dimension, make_predicate, metric};
pub use expr::{
    Condition, FilterNode, FilterValue, LogicalOperator, NumericOperation, Operator, Predicate,
    StringMatch,
};
pub use parse::parse_predicate;
