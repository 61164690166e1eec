//! Query service collaborators.
//!
//! The façade never talks HTTP directly. It hands a [`ReportRequest`] to a
//! [`QueryService`] and gets back a raw [`RunReportResponse`].
//!
//! ```text
//! ┌──────────────┐   ReportRequest    ┌──────────────────┐
//! │   Reports    │ ─────────────────▶ │  QueryService    │
//! │   façade     │ ◀───────────────── │  (Ga4Client, …)  │
//! └──────────────┘  RunReportResponse └──────────────────┘
//!                                              │ bearer token
//!                                              ▼
//!                                      ┌──────────────────┐
//!                                      │   TokenSource    │
//!                                      └──────────────────┘
//! ```
//!
//! [`ReportRequest`]: crate::request::ReportRequest
//! [`RunReportResponse`]: crate::response::RunReportResponse

mod credentials;
mod error;
mod http;
mod service;

pub use credentials::{ServiceAccountKey, ANALYTICS_READONLY_SCOPE};
pub use error::{ServiceError, ServiceResult};
pub use http::{Ga4Client, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
pub use service::{QueryService, StaticToken, TokenSource};
