//! # ga4-reports
//!
//! A reporting façade over the Google Analytics 4 Data API.
//!
//! ## Architecture
//!
//! Callers describe a report with named fields, date ranges, and filter
//! trees; the crate validates and assembles the request, hands it to a query
//! service, and normalizes the answer into a typed table:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │     Registry (named templates)   +   Filter trees        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [request assembly + validation]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    ReportRequest                         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [QueryService: Ga4Client, …]
//! ┌─────────────────────────────────────────────────────────┐
//! │             RunReportResponse (headers + rows)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [normalize]
//! ┌─────────────────────────────────────────────────────────┐
//! │          ReportTable (typed columns and rows)            │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod field;
pub mod filter;
pub mod logging;
pub mod registry;
pub mod reports;
pub mod request;
pub mod response;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::client::{Ga4Client, QueryService, ServiceError, StaticToken, TokenSource};
    pub use crate::config::Settings;
    pub use crate::error::{ReportError, ReportResult};
    pub use crate::field::FieldKind;
    pub use crate::filter::{
        all_of, any_of, combine, dimension, make_predicate, metric, FilterNode, LogicalOperator,
        NumericOperation, Operator, StringMatch,
    };
    pub use crate::registry::{ReportConfigRegistry, ReportTemplate};
    pub use crate::reports::Reports;
    pub use crate::request::{
        build_request, predefined_request, DateRange, DateSpec, OrderSpec, ReportQuery,
        ReportRequest, TemplateQuery,
    };
    pub use crate::response::{normalize, ReportTable, RunReportResponse, Scalar};
}

// Also export at crate root for convenience
pub use error::{ReportError, ReportResult};
pub use filter::FilterNode;
pub use registry::ReportConfigRegistry;
pub use reports::Reports;
pub use request::{ReportQuery, ReportRequest, TemplateQuery};
pub use response::{normalize, ReportTable, RunReportResponse};
