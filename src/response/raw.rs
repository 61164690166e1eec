//! Response body of the Data API `runReport` method.
//!
//! Only the parts the normalizer reads are modeled; other fields are
//! ignored. Absent lists (the service omits `rows` for an empty report)
//! deserialize as empty.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportResponse {
    #[serde(default)]
    pub dimension_headers: Vec<DimensionHeader>,
    #[serde(default)]
    pub metric_headers: Vec<MetricHeader>,
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Total rows matching the query, independent of limit and offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DimensionHeader {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetricHeader {
    pub name: String,
    /// Declared type such as `TYPE_INTEGER` or `TYPE_FLOAT`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub dimension_values: Vec<Value>,
    #[serde(default)]
    pub metric_values: Vec<Value>,
}

/// A cell; the service sends every value as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Value {
    #[serde(default)]
    pub value: String,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value {
            value: s.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl RunReportResponse {
    /// Build a response from header names and string rows.
    pub fn from_parts<D, M>(
        dimension_headers: &[&str],
        metric_headers: &[&str],
        rows: impl IntoIterator<Item = (D, M)>,
    ) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        Self {
            dimension_headers: dimension_headers
                .iter()
                .map(|name| DimensionHeader {
                    name: name.to_string(),
                })
                .collect(),
            metric_headers: metric_headers
                .iter()
                .map(|name| MetricHeader {
                    name: name.to_string(),
                    metric_type: None,
                })
                .collect(),
            rows: rows
                .into_iter()
                .map(|(dims, mets)| Row {
                    dimension_values: dims.into_iter().map(|v| v.as_ref().into()).collect(),
                    metric_values: mets.into_iter().map(|v| v.as_ref().into()).collect(),
                })
                .collect(),
            row_count: None,
            metadata: None,
        }
    }
}
