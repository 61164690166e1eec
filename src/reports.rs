//! The caller-facing façade.
//!
//! [`Reports`] ties the pieces together: it owns a template registry and a
//! [`QueryService`], assembles requests, dispatches them, and normalizes the
//! responses.
//!
//! ```ignore
//! use ga4_reports::prelude::*;
//!
//! let reports = Reports::connect(&Settings::load()?)?;
//! let table = reports
//!     .run_template(TemplateQuery::between("page_performance", "7daysAgo", "yesterday")?)
//!     .await?;
//! println!("{}", table.to_text());
//! ```

use chrono::NaiveDate;

use crate::client::{Ga4Client, QueryService};
use crate::config::Settings;
use crate::error::ReportResult;
use crate::filter::{self, FilterNode, FilterValue, LogicalOperator, Operator};
use crate::registry::{ReportConfigRegistry, DEFAULT_CHANNEL_DIMENSION};
use crate::request::{ReportQuery, ReportRequest, TemplateQuery};
use crate::response::{normalize, ReportTable, RunReportResponse};

/// Report façade over a query service.
#[derive(Debug)]
pub struct Reports<S> {
    service: S,
    registry: ReportConfigRegistry,
}

impl<S: QueryService> Reports<S> {
    /// Façade with the built-in templates.
    pub fn new(service: S) -> Self {
        Self::with_registry(
            service,
            ReportConfigRegistry::with_builtin_templates(DEFAULT_CHANNEL_DIMENSION),
        )
    }

    /// Façade with an explicit registry.
    pub fn with_registry(service: S, registry: ReportConfigRegistry) -> Self {
        Self { service, registry }
    }

    pub fn registry(&self) -> &ReportConfigRegistry {
        &self.registry
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Build a single-field filter. See [`filter::make_predicate`].
    pub fn build_filter(
        &self,
        field: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<FilterValue>,
        is_dimension: bool,
        negate: bool,
    ) -> ReportResult<FilterNode> {
        filter::make_predicate(field, operator, value, is_dimension, negate)
    }

    /// Combine filters under one group. See [`filter::combine`].
    pub fn combine_filters(
        &self,
        filters: Vec<FilterNode>,
        operator: LogicalOperator,
    ) -> ReportResult<FilterNode> {
        filter::combine(filters, operator)
    }

    /// Insert or replace a template.
    pub fn register_template<D, M>(
        &self,
        name: impl Into<String>,
        dimensions: impl IntoIterator<Item = D>,
        metrics: impl IntoIterator<Item = M>,
    ) where
        D: Into<String>,
        M: Into<String>,
    {
        self.registry.add(name, dimensions, metrics);
    }

    // =========================================================================
    // Assembly
    // =========================================================================

    /// Resolve a template and assemble its request without sending it.
    pub fn template_request(&self, query: TemplateQuery) -> ReportResult<ReportRequest> {
        query.resolve(&self.registry)?.build()
    }

    /// As [`template_request`](Self::template_request), with relative dates
    /// checked against `today`.
    pub fn template_request_as_of(
        &self,
        query: TemplateQuery,
        today: NaiveDate,
    ) -> ReportResult<ReportRequest> {
        query.resolve(&self.registry)?.build_as_of(today)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Send an assembled request; service failures become
    /// [`ReportError::QueryService`](crate::ReportError::QueryService), token
    /// failures [`ReportError::Credentials`](crate::ReportError::Credentials).
    pub async fn execute(&self, request: &ReportRequest) -> ReportResult<RunReportResponse> {
        let response = self.service.run_report(request).await?;
        tracing::info!(
            rows = response.rows.len(),
            row_count = response.row_count,
            "report returned"
        );
        Ok(response)
    }

    /// Run an ad-hoc report and return the raw response.
    pub async fn run_report_raw(&self, query: ReportQuery) -> ReportResult<RunReportResponse> {
        let request = query.build()?;
        self.execute(&request).await
    }

    /// Run an ad-hoc report.
    pub async fn run_report(&self, query: ReportQuery) -> ReportResult<ReportTable> {
        let response = self.run_report_raw(query).await?;
        normalize(&response)
    }

    /// Run a template report and return the raw response.
    pub async fn run_template_raw(&self, query: TemplateQuery) -> ReportResult<RunReportResponse> {
        tracing::info!(template = %query.template, "running template report");
        let request = self.template_request(query)?;
        self.execute(&request).await
    }

    /// Run a template report.
    pub async fn run_template(&self, query: TemplateQuery) -> ReportResult<ReportTable> {
        let response = self.run_template_raw(query).await?;
        normalize(&response)
    }
}

impl Reports<Ga4Client> {
    /// HTTP-backed façade using the configured property, credentials, and
    /// templates.
    pub fn connect(settings: &Settings) -> ReportResult<Self> {
        let client = Ga4Client::from_settings(settings)?;
        tracing::info!(property = %client.property(), "connected to analytics property");
        Ok(Self::with_registry(client, settings.registry()))
    }
}
