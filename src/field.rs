//! Field kinds and field-list helpers shared by templates and requests.

use std::fmt;

use serde::Serialize;

/// Whether a field is a categorical dimension or a measured metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Dimension,
    Metric,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Dimension => "dimension",
            FieldKind::Metric => "metric",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append each field of `extra` not already in `base`, keeping first-seen order.
pub fn append_unique<I, S>(base: &mut Vec<String>, extra: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for field in extra {
        let field = field.into();
        if !base.contains(&field) {
            base.push(field);
        }
    }
}

/// Collect fields into a list without duplicates, keeping first-seen order.
pub fn unique_fields<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = Vec::new();
    append_unique(&mut out, fields);
    out
}
