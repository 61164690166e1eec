//! Text renderings of a [`ReportTable`].

use super::table::{ReportTable, Scalar};

impl ReportTable {
    /// Rows as a JSON array of objects, keys in column order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Comma-separated values with a header line.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = self.columns().iter().map(|c| csv_field(&c.name)).collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for index in 0..self.len() {
            let cells: Vec<String> = self
                .ordered_row(index)
                .unwrap_or_default()
                .into_iter()
                .map(|v| match v {
                    Scalar::Text(s) => csv_field(s),
                    other => other.to_string(),
                })
                .collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }

    /// Aligned plain-text table; numbers right-aligned.
    pub fn to_text(&self) -> String {
        let columns = self.columns();
        let cells: Vec<Vec<String>> = (0..self.len())
            .map(|i| {
                self.ordered_row(i)
                    .unwrap_or_default()
                    .into_iter()
                    .map(ToString::to_string)
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(c.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c.name, w = *w))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');

        for (r, row) in cells.iter().enumerate() {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, w))| {
                    let numeric = self.get(r, &columns[i].name).is_some_and(Scalar::is_numeric);
                    if numeric {
                        format!("{:>w$}", cell, w = *w)
                    } else {
                        format!("{:<w$}", cell, w = *w)
                    }
                })
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
