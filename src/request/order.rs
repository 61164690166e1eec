//! Row ordering.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::error::{ReportError, ReportResult};

/// How dimension values are compared when ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DimensionOrderType {
    #[default]
    Alphanumeric,
    CaseInsensitiveAlphanumeric,
    Numeric,
}

/// One ordering term of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSpec {
    Dimension {
        name: String,
        order_type: DimensionOrderType,
        desc: bool,
    },
    Metric {
        name: String,
        desc: bool,
    },
}

impl OrderSpec {
    /// Order by a dimension, ascending, alphanumerically.
    pub fn dimension(name: impl Into<String>) -> Self {
        OrderSpec::Dimension {
            name: name.into(),
            order_type: DimensionOrderType::default(),
            desc: false,
        }
    }

    /// Order by a metric, ascending.
    pub fn metric(name: impl Into<String>) -> Self {
        OrderSpec::Metric {
            name: name.into(),
            desc: false,
        }
    }

    /// Read `<field> [asc|desc]`. Fields named in `metrics` order as
    /// metrics, everything else as dimensions.
    pub fn parse(text: &str, metrics: &[String]) -> ReportResult<Self> {
        let malformed = || ReportError::invalid_text(text, "'<field> [asc|desc]'");

        let mut parts = text.split_whitespace();
        let field = parts.next().ok_or_else(malformed)?;
        let descending = match parts.next() {
            None => false,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => false,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => true,
            Some(_) => return Err(malformed()),
        };
        if parts.next().is_some() {
            return Err(malformed());
        }

        let order = if metrics.iter().any(|m| m == field) {
            OrderSpec::metric(field)
        } else {
            OrderSpec::dimension(field)
        };
        Ok(if descending { order.descending() } else { order })
    }

    pub fn descending(mut self) -> Self {
        match &mut self {
            OrderSpec::Dimension { desc, .. } | OrderSpec::Metric { desc, .. } => *desc = true,
        }
        self
    }

    /// Set the comparison for a dimension ordering. No effect on metrics.
    pub fn with_order_type(mut self, order_type: DimensionOrderType) -> Self {
        if let OrderSpec::Dimension { order_type: ot, .. } = &mut self {
            *ot = order_type;
        }
        self
    }

    pub fn field_name(&self) -> &str {
        match self {
            OrderSpec::Dimension { name, .. } | OrderSpec::Metric { name, .. } => name,
        }
    }

    pub fn is_descending(&self) -> bool {
        match self {
            OrderSpec::Dimension { desc, .. } | OrderSpec::Metric { desc, .. } => *desc,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDimensionOrder<'a> {
    dimension_name: &'a str,
    order_type: DimensionOrderType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireMetricOrder<'a> {
    metric_name: &'a str,
}

impl Serialize for OrderSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OrderBy", 2)?;
        match self {
            OrderSpec::Dimension {
                name,
                order_type,
                desc,
            } => {
                state.serialize_field(
                    "dimension",
                    &WireDimensionOrder {
                        dimension_name: name,
                        order_type: *order_type,
                    },
                )?;
                state.serialize_field("desc", desc)?;
            }
            OrderSpec::Metric { name, desc } => {
                state.serialize_field("metric", &WireMetricOrder { metric_name: name })?;
                state.serialize_field("desc", desc)?;
            }
        }
        state.end()
    }
}
