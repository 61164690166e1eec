//! Report request assembly.
//!
//! A [`ReportQuery`] collects what the caller asked for and is validated into
//! a [`ReportRequest`] before anything is sent:
//!
//! ```text
//! ReportQuery ──build()──▶ ReportRequest ──▶ QueryService
//!      ▲
//! TemplateQuery ──resolve(registry)
//! ```
//!
//! Validation is structural only: date ranges must be ordered, at least one
//! field must be requested, and the limit must be positive. Filter contents
//! and field names are the service's concern.

mod date;
mod order;

pub use date::{DateRange, DateSpec};
pub use order::{DimensionOrderType, OrderSpec};

use chrono::{NaiveDate, Utc};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::field::unique_fields;
use crate::filter::FilterNode;
use crate::registry::ReportConfigRegistry;

/// Row limit used when the caller does not set one.
pub const DEFAULT_LIMIT: u64 = 10_000;

// ============================================================================
// ReportRequest
// ============================================================================

/// A validated report request, in the shape the service expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub date_ranges: Vec<DateRange>,
    #[serde(serialize_with = "serialize_named")]
    pub dimensions: Vec<String>,
    #[serde(serialize_with = "serialize_named")]
    pub metrics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<FilterNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_filter: Option<FilterNode>,
    pub limit: u64,
    pub offset: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_bys: Vec<OrderSpec>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub keep_empty_rows: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

/// Field lists go over the wire as `[{"name": ...}, ...]`.
fn serialize_named<S: Serializer>(names: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Named<'a> {
        name: &'a str,
    }

    let mut seq = serializer.serialize_seq(Some(names.len()))?;
    for name in names {
        seq.serialize_element(&Named { name })?;
    }
    seq.end()
}

/// Assemble a request from its parts.
///
/// Dimension and metric lists keep their order; a repeated name keeps its
/// first position.
///
/// # Errors
///
/// - [`ReportError::InvalidDateRange`] if `date_ranges` is empty or a range
///   ends before it starts.
/// - [`ReportError::EmptyQuery`] if no dimension and no metric is requested.
/// - [`ReportError::InvalidLimit`] if `limit` is zero.
#[allow(clippy::too_many_arguments)]
pub fn build_request(
    date_ranges: Vec<DateRange>,
    dimensions: Vec<String>,
    metrics: Vec<String>,
    dimension_filter: Option<FilterNode>,
    metric_filter: Option<FilterNode>,
    limit: u64,
    offset: u64,
    order_bys: Vec<OrderSpec>,
) -> ReportResult<ReportRequest> {
    ReportQuery {
        date_ranges,
        dimensions,
        metrics,
        dimension_filter,
        metric_filter,
        limit,
        offset,
        order_bys,
        ..ReportQuery::default()
    }
    .build()
}

// ============================================================================
// ReportQuery
// ============================================================================

/// An ad-hoc report description, validated by [`ReportQuery::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    pub date_ranges: Vec<DateRange>,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub dimension_filter: Option<FilterNode>,
    pub metric_filter: Option<FilterNode>,
    pub limit: u64,
    pub offset: u64,
    pub order_bys: Vec<OrderSpec>,
    pub keep_empty_rows: bool,
    pub currency_code: Option<String>,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            date_ranges: Vec::new(),
            dimensions: Vec::new(),
            metrics: Vec::new(),
            dimension_filter: None,
            metric_filter: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            order_bys: Vec::new(),
            keep_empty_rows: false,
            currency_code: None,
        }
    }
}

impl ReportQuery {
    /// A query over one date range.
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_ranges: vec![date_range],
            ..Self::default()
        }
    }

    /// A query over one range given as `YYYY-MM-DD` (or relative) strings.
    pub fn between(start: &str, end: &str) -> ReportResult<Self> {
        Ok(Self::new(DateRange::new(start, end)?))
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_ranges.push(date_range);
        self
    }

    pub fn with_dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions.extend(dimensions.into_iter().map(Into::into));
        self
    }

    pub fn with_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics.extend(metrics.into_iter().map(Into::into));
        self
    }

    pub fn with_dimension_filter(mut self, filter: FilterNode) -> Self {
        self.dimension_filter = Some(filter);
        self
    }

    pub fn with_metric_filter(mut self, filter: FilterNode) -> Self {
        self.metric_filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_order_by(mut self, order: OrderSpec) -> Self {
        self.order_bys.push(order);
        self
    }

    /// Ask the service to return rows whose metrics are all zero.
    pub fn keep_empty_rows(mut self, keep: bool) -> Self {
        self.keep_empty_rows = keep;
        self
    }

    /// ISO 4217 code used for currency metrics.
    pub fn with_currency_code(mut self, code: impl Into<String>) -> Self {
        self.currency_code = Some(code.into());
        self
    }

    /// Validate into a request, resolving relative dates against today (UTC).
    ///
    /// The service evaluates relative dates in the property's time zone, so
    /// ranges mixing a calendar date with a relative one get a day of slack.
    pub fn build(self) -> ReportResult<ReportRequest> {
        self.build_as_of(Utc::now().date_naive())
    }

    /// Validate into a request, resolving relative dates against `today`.
    pub fn build_as_of(self, today: NaiveDate) -> ReportResult<ReportRequest> {
        if self.date_ranges.is_empty() {
            return Err(ReportError::InvalidDateRange(
                "at least one date range is required".to_string(),
            ));
        }
        for range in &self.date_ranges {
            range.validate(today)?;
        }

        if self.dimensions.is_empty() && self.metrics.is_empty() {
            return Err(ReportError::EmptyQuery);
        }

        if self.limit == 0 {
            return Err(ReportError::InvalidLimit(self.limit));
        }

        let request = ReportRequest {
            date_ranges: self.date_ranges,
            dimensions: unique_fields(self.dimensions),
            metrics: unique_fields(self.metrics),
            dimension_filter: self.dimension_filter,
            metric_filter: self.metric_filter,
            limit: self.limit,
            offset: self.offset,
            order_bys: self.order_bys,
            keep_empty_rows: self.keep_empty_rows,
            currency_code: self.currency_code,
        };

        tracing::debug!(
            date_ranges = request.date_ranges.len(),
            dimensions = request.dimensions.len(),
            metrics = request.metrics.len(),
            limit = request.limit,
            offset = request.offset,
            "assembled report request"
        );

        Ok(request)
    }
}

// ============================================================================
// TemplateQuery
// ============================================================================

/// A report based on a registered template, with optional extra fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateQuery {
    pub template: String,
    pub date_range: DateRange,
    pub extra_dimensions: Vec<String>,
    pub extra_metrics: Vec<String>,
    pub dimension_filter: Option<FilterNode>,
    pub metric_filter: Option<FilterNode>,
    pub limit: u64,
}

impl TemplateQuery {
    pub fn new(template: impl Into<String>, date_range: DateRange) -> Self {
        Self {
            template: template.into(),
            date_range,
            extra_dimensions: Vec::new(),
            extra_metrics: Vec::new(),
            dimension_filter: None,
            metric_filter: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// A template query over `[start, end]`.
    pub fn between(template: impl Into<String>, start: &str, end: &str) -> ReportResult<Self> {
        Ok(Self::new(template, DateRange::new(start, end)?))
    }

    pub fn with_extra_dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_dimensions.extend(dimensions.into_iter().map(Into::into));
        self
    }

    pub fn with_extra_metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_metrics.extend(metrics.into_iter().map(Into::into));
        self
    }

    pub fn with_dimension_filter(mut self, filter: FilterNode) -> Self {
        self.dimension_filter = Some(filter);
        self
    }

    pub fn with_metric_filter(mut self, filter: FilterNode) -> Self {
        self.metric_filter = Some(filter);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Resolve the template's fields into an ad-hoc query.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownTemplate`] if the template is not
    /// registered.
    pub fn resolve(self, registry: &ReportConfigRegistry) -> ReportResult<ReportQuery> {
        let (dimensions, metrics) =
            registry.resolve(&self.template, self.extra_dimensions, self.extra_metrics)?;

        Ok(ReportQuery {
            date_ranges: vec![self.date_range],
            dimensions,
            metrics,
            dimension_filter: self.dimension_filter,
            metric_filter: self.metric_filter,
            limit: self.limit,
            ..ReportQuery::default()
        })
    }
}

/// Resolve a template and assemble its request.
pub fn predefined_request(
    registry: &ReportConfigRegistry,
    query: TemplateQuery,
) -> ReportResult<ReportRequest> {
    query.resolve(registry)?.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{dimension, StringMatch};
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn range() -> DateRange {
        DateRange::new("2025-02-25", "2025-02-28").unwrap()
    }

    #[test]
    fn test_defaults() {
        let request = ReportQuery::new(range())
            .with_metrics(["sessions"])
            .build_as_of(today())
            .unwrap();
        assert_eq!(request.limit, DEFAULT_LIMIT);
        assert_eq!(request.offset, 0);
        assert!(request.order_bys.is_empty());
        assert!(request.dimension_filter.is_none());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let err = ReportQuery::new(range()).build_as_of(today()).unwrap_err();
        assert_eq!(err, ReportError::EmptyQuery);
    }

    #[test]
    fn test_missing_date_range_rejected() {
        let err = ReportQuery::default()
            .with_metrics(["sessions"])
            .build_as_of(today())
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidDateRange(_)));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = ReportQuery::new(range())
            .with_dimensions(["country"])
            .with_limit(0)
            .build_as_of(today())
            .unwrap_err();
        assert_eq!(err, ReportError::InvalidLimit(0));
    }

    #[test]
    fn test_duplicate_fields_collapse() {
        let request = ReportQuery::new(range())
            .with_dimensions(["date", "country", "date"])
            .with_metrics(["sessions", "sessions"])
            .build_as_of(today())
            .unwrap();
        assert_eq!(request.dimensions, vec!["date", "country"]);
        assert_eq!(request.metrics, vec!["sessions"]);
    }

    #[test]
    fn test_filters_attached_as_given() {
        let filter: FilterNode = dimension("sessionMedium", StringMatch::Exact, "organic").into();
        let request = ReportQuery::new(range())
            .with_dimensions(["sessionSource"])
            .with_dimension_filter(filter.clone())
            .build_as_of(today())
            .unwrap();
        assert_eq!(request.dimension_filter, Some(filter));
    }

    #[test]
    fn test_wire_shape_omits_unset_options() {
        let request = ReportQuery::new(range())
            .with_dimensions(["deviceCategory"])
            .with_metrics(["sessions"])
            .build_as_of(today())
            .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "dateRanges": [{"startDate": "2025-02-25", "endDate": "2025-02-28"}],
                "dimensions": [{"name": "deviceCategory"}],
                "metrics": [{"name": "sessions"}],
                "limit": 10000,
                "offset": 0
            })
        );
    }

    #[test]
    fn test_template_query_resolves_fields() {
        let registry = ReportConfigRegistry::new();
        registry.add("devices", ["deviceCategory"], ["sessions"]);

        let request = predefined_request(
            &registry,
            TemplateQuery::new("devices", range())
                .with_extra_dimensions(["browser", "deviceCategory"])
                .with_extra_metrics(["bounceRate"])
                .with_limit(500),
        )
        .unwrap();

        assert_eq!(request.dimensions, vec!["deviceCategory", "browser"]);
        assert_eq!(request.metrics, vec!["sessions", "bounceRate"]);
        assert_eq!(request.date_ranges, vec![range()]);
        assert_eq!(request.limit, 500);
    }

    #[test]
    fn test_template_query_unknown_template() {
        let registry = ReportConfigRegistry::new();
        let err = TemplateQuery::new("missing", range())
            .resolve(&registry)
            .unwrap_err();
        assert_eq!(err, ReportError::UnknownTemplate("missing".into()));
    }
}
