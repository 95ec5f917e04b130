//! Report export for explorer views.
//!
//! This module renders the component list, the package usage table and a
//! component's prop analysis in various formats: plain text, JSON, and
//! Markdown.

pub mod json;
pub mod markdown;
pub mod text;

use crate::analysis::{FilteredPropCounts, PropAnalysis};
use crate::payload::{Component, PackageWithCount};
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Plain text - aligned columns for the terminal
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// The visible component list.
#[derive(Debug, Clone)]
pub struct ComponentListReport<'a> {
    /// Components after filtering and sorting
    pub components: Vec<&'a Component>,
    /// Number of components before filtering
    pub total: usize,
}

/// Prop analysis of one component, with counts over the filtered subset.
#[derive(Debug, Clone)]
pub struct PropReport<'a> {
    pub component: &'a Component,
    pub analysis: &'a [PropAnalysis],
    pub filtered: &'a FilteredPropCounts,
    /// Number of instances passing the filters
    pub filtered_instances: usize,
}

impl PropReport<'_> {
    /// True if the filtered subset is smaller than the full instance list.
    pub fn is_filtered(&self) -> bool {
        self.filtered_instances != self.component.instance_count()
    }
}

/// Data container for export operations.
#[derive(Debug, Clone)]
pub enum Report<'a> {
    Components(ComponentListReport<'a>),
    Packages(&'a [PackageWithCount]),
    Props(PropReport<'a>),
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the report to the given writer.
    fn export<W: Write>(&self, report: &Report<'_>, writer: &mut W) -> io::Result<()>;
}

/// Export a report in the specified format.
pub fn export<W: Write>(format: ExportFormat, report: &Report<'_>, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::TextExporter.export(report, writer),
        ExportFormat::Json => json::JsonExporter.export(report, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(report, writer),
    }
}

/// Export a report to a string.
pub fn export_to_string(format: ExportFormat, report: &Report<'_>) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Formats a percentage with one decimal place.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::payload::{Component, TransformedPayload};
    use crate::schema::parse_str;

    pub const PAYLOAD: &str = r#"{
        "meta": { "base_path": "/repo" },
        "components": [
            {
                "id": "c1",
                "name": "Button",
                "package": { "type": "external", "name": "ui", "version": "1.0.0" },
                "instances": [
                    {
                        "file_path": "src/a.tsx",
                        "raw": "<Button variant=\"outline\" />",
                        "span": { "start": 0, "end": 10, "start_line": 1, "end_line": 1, "start_col": 0, "end_col": 10 },
                        "import_specifier": "ui",
                        "resolved_path": "node_modules/ui/index.js",
                        "package": { "type": "external", "name": "ui", "version": "1.0.0" },
                        "props": [
                            { "key": "variant", "raw": "\"outline\"", "prop_type": "string", "value": "outline" }
                        ]
                    },
                    {
                        "file_path": "src/b.tsx",
                        "raw": "<Button />",
                        "span": { "start": 0, "end": 10, "start_line": 1, "end_line": 1, "start_col": 0, "end_col": 10 },
                        "import_specifier": "ui",
                        "resolved_path": "node_modules/ui/index.js",
                        "package": { "type": "external", "name": "ui", "version": "1.0.0" },
                        "props": []
                    }
                ]
            },
            {
                "id": "c2",
                "name": "div",
                "package": { "type": "native" },
                "instances": []
            }
        ]
    }"#;

    pub fn payload() -> TransformedPayload {
        match parse_str(PAYLOAD) {
            Ok(payload) => TransformedPayload::from_payload(payload),
            Err(e) => panic!("fixture payload is invalid: {}", e),
        }
    }

    pub fn button(payload: &TransformedPayload) -> &Component {
        match payload.component("c1") {
            Some(component) => component,
            None => panic!("fixture has no Button"),
        }
    }
}
