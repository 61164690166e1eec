//! Named report templates.
//!
//! A template pairs an ordered dimension list with an ordered metric list.
//! Callers resolve a template with extra fields; the base fields always come
//! first and extras are appended only when not already present.
//!
//! The registry may be shared between tasks: each entry is guarded by the
//! map's shard lock, so `add` replaces an entry atomically with respect to a
//! concurrent `resolve`.

mod builtin;

pub use builtin::{
    builtin_templates, DAILY_KPIS, DEFAULT_CHANNEL_DIMENSION, ECOMMERCE, PAGE_PERFORMANCE,
};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::field::{append_unique, unique_fields};

/// A named (dimensions, metrics) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub name: String,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
}

impl ReportTemplate {
    /// Create a template. Repeated field names keep their first position.
    pub fn new<D, M>(
        name: impl Into<String>,
        dimensions: impl IntoIterator<Item = D>,
        metrics: impl IntoIterator<Item = M>,
    ) -> Self
    where
        D: Into<String>,
        M: Into<String>,
    {
        Self {
            name: name.into(),
            dimensions: unique_fields(dimensions),
            metrics: unique_fields(metrics),
        }
    }
}

/// Registry of report templates, keyed by name.
#[derive(Debug, Default)]
pub struct ReportConfigRegistry {
    templates: DashMap<String, ReportTemplate>,
}

impl ReportConfigRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the given templates.
    pub fn with_templates(templates: impl IntoIterator<Item = ReportTemplate>) -> Self {
        let registry = Self::new();
        for template in templates {
            registry.insert(template);
        }
        registry
    }

    /// A registry seeded with the built-in templates.
    pub fn with_builtin_templates(channel_dimension: &str) -> Self {
        Self::with_templates(builtin_templates(channel_dimension))
    }

    /// Insert or replace the template under `name`.
    pub fn add<D, M>(
        &self,
        name: impl Into<String>,
        dimensions: impl IntoIterator<Item = D>,
        metrics: impl IntoIterator<Item = M>,
    ) where
        D: Into<String>,
        M: Into<String>,
    {
        self.insert(ReportTemplate::new(name, dimensions, metrics));
    }

    /// Insert or replace a template under its own name.
    pub fn insert(&self, template: ReportTemplate) {
        tracing::debug!(
            template = %template.name,
            dimensions = template.dimensions.len(),
            metrics = template.metrics.len(),
            "registering report template"
        );
        self.templates.insert(template.name.clone(), template);
    }

    /// Resolve a template's fields merged with extra fields.
    ///
    /// Returns `(dimensions, metrics)`: the template's lists followed by each
    /// extra field that is not already present, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownTemplate`] if no template has this name.
    pub fn resolve<D, M>(
        &self,
        name: &str,
        extra_dimensions: impl IntoIterator<Item = D>,
        extra_metrics: impl IntoIterator<Item = M>,
    ) -> ReportResult<(Vec<String>, Vec<String>)>
    where
        D: Into<String>,
        M: Into<String>,
    {
        let (mut dimensions, mut metrics) = {
            let template = self
                .templates
                .get(name)
                .ok_or_else(|| ReportError::UnknownTemplate(name.to_string()))?;
            (template.dimensions.clone(), template.metrics.clone())
        };

        append_unique(&mut dimensions, extra_dimensions);
        append_unique(&mut metrics, extra_metrics);

        Ok((dimensions, metrics))
    }

    /// A copy of the template under `name`.
    pub fn get(&self, name: &str) -> Option<ReportTemplate> {
        self.templates.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// All templates, sorted by name.
    pub fn templates(&self) -> Vec<ReportTemplate> {
        let mut templates: Vec<ReportTemplate> =
            self.templates.iter().map(|e| e.value().clone()).collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
