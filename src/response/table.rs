//! Normalized report tables.

use std::collections::HashMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::field::FieldKind;

use super::raw::RunReportResponse;

/// A typed cell value.
///
/// Serializes as a bare JSON string or number. NaN and the infinities have no
/// JSON number form and serialize as the strings `"NaN"`, `"inf"` and `"-inf"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Scalar::Text(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(x) if x.is_finite() => {
                let mut buffer = ryu::Buffer::new();
                f.write_str(buffer.format_finite(*x))
            }
            Scalar::Float(x) => write!(f, "{x}"),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Integer(n) => serializer.serialize_i64(*n),
            Scalar::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            Scalar::Float(x) => serializer.collect_str(x),
        }
    }
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: FieldKind,
}

/// One table row, keyed by column name.
pub type Row = HashMap<String, Scalar>;

/// A report normalized into typed columns and rows.
///
/// Columns are the response's dimension headers followed by its metric
/// headers, in the order the service returned them. Dimension cells are
/// always [`Scalar::Text`]; metric cells are [`Scalar::Integer`] when every
/// value in the column is an integer and [`Scalar::Float`] otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    columns: Vec<Column>,
    rows: Vec<Row>,
    total_rows: Option<u64>,
}

impl ReportTable {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Scalar> {
        self.rows.get(row).and_then(|r| r.get(name))
    }

    /// All cells of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> Option<Vec<&Scalar>> {
        self.column(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(name)).collect())
    }

    /// Rows matching the query before paging, when the service reported it.
    pub fn total_rows(&self) -> Option<u64> {
        self.total_rows
    }

    /// Cells of one row in column order.
    pub fn ordered_row(&self, row: usize) -> Option<Vec<&Scalar>> {
        let r = self.rows.get(row)?;
        Some(self.columns.iter().filter_map(|c| r.get(&c.name)).collect())
    }
}

/// Rows serialize as a list of objects whose keys follow column order.
impl Serialize for ReportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct OrderedRow<'a> {
            columns: &'a [Column],
            row: &'a Row,
        }

        impl Serialize for OrderedRow<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.columns.len()))?;
                for column in self.columns {
                    if let Some(value) = self.row.get(&column.name) {
                        map.serialize_entry(&column.name, value)?;
                    }
                }
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&OrderedRow {
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize a raw response into a [`ReportTable`].
///
/// # Errors
///
/// - [`ReportError::MalformedResponse`] if a row's value count differs from
///   the header count, or a header name repeats.
/// - [`ReportError::NumericCoercion`] if a metric value is not numeric.
///
/// No partial table is returned on error. Metric text such as `NaN` or `inf`
/// reads as a non-finite [`Scalar::Float`]; see [`Scalar`] for how it renders.
pub fn normalize(response: &RunReportResponse) -> ReportResult<ReportTable> {
    let dimension_names: Vec<&str> = response
        .dimension_headers
        .iter()
        .map(|h| h.name.as_str())
        .collect();
    let metric_names: Vec<&str> = response
        .metric_headers
        .iter()
        .map(|h| h.name.as_str())
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(dimension_names.len() + metric_names.len());
    for (names, kind) in [
        (&dimension_names, FieldKind::Dimension),
        (&metric_names, FieldKind::Metric),
    ] {
        for name in names.iter() {
            if columns.iter().any(|c| c.name == *name) {
                return Err(ReportError::MalformedResponse(format!(
                    "duplicate column '{name}' in response headers"
                )));
            }
            columns.push(Column {
                name: name.to_string(),
                kind,
            });
        }
    }

    // Positional zip; every row must match the headers exactly.
    for (index, row) in response.rows.iter().enumerate() {
        if row.dimension_values.len() != dimension_names.len() {
            return Err(ReportError::MalformedResponse(format!(
                "row {index} has {} dimension values but the response has {} dimension headers",
                row.dimension_values.len(),
                dimension_names.len()
            )));
        }
        if row.metric_values.len() != metric_names.len() {
            return Err(ReportError::MalformedResponse(format!(
                "row {index} has {} metric values but the response has {} metric headers",
                row.metric_values.len(),
                metric_names.len()
            )));
        }
    }

    let metric_columns = metric_names
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let raw: Vec<&str> = response
                .rows
                .iter()
                .map(|row| row.metric_values[col].value.as_str())
                .collect();
            coerce_metric_column(name, &raw)
        })
        .collect::<ReportResult<Vec<Vec<Scalar>>>>()?;

    let rows = response
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut out = Row::with_capacity(columns.len());
            for (name, value) in dimension_names.iter().zip(&row.dimension_values) {
                out.insert(name.to_string(), Scalar::Text(value.value.clone()));
            }
            for (name, values) in metric_names.iter().zip(&metric_columns) {
                out.insert(name.to_string(), values[index].clone());
            }
            out
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        rows = rows.len(),
        dimensions = dimension_names.len(),
        metrics = metric_names.len(),
        "normalized report response"
    );

    Ok(ReportTable {
        columns,
        rows,
        total_rows: response.row_count,
    })
}

/// Coerce one metric column. Integer-typed when every value is an integer,
/// float-typed otherwise.
fn coerce_metric_column(column: &str, values: &[&str]) -> ReportResult<Vec<Scalar>> {
    let integers: Option<Vec<i64>> = values.iter().map(|v| v.trim().parse().ok()).collect();
    if let Some(integers) = integers {
        return Ok(integers.into_iter().map(Scalar::Integer).collect());
    }

    values
        .iter()
        .enumerate()
        .map(|(row, v)| {
            v.trim()
                .parse::<f64>()
                .map(Scalar::Float)
                .map_err(|_| ReportError::NumericCoercion {
                    column: column.to_string(),
                    row,
                    value: v.to_string(),
                })
        })
        .collect()
}
