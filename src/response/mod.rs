//! Service responses and their normalized table form.

mod raw;
mod render;
mod table;

pub use raw::{
    DimensionHeader, MetricHeader, ResponseMetadata, Row as ResponseRow, RunReportResponse, Value,
};
pub use table::{normalize, Column, ReportTable, Row, Scalar};
