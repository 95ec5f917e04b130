//! JSON export implementation.
//!
//! Exports explorer reports in JSON format for machine-readable output.

use super::{ComponentListReport, Exporter, PropReport, Report};
use crate::payload::{Component, PackageWithCount};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable component row for JSON output.
#[derive(Serialize)]
struct JsonComponent<'a> {
    id: &'a str,
    name: &'a str,
    package: &'a str,
    instances: usize,
}

impl<'a> From<&'a Component> for JsonComponent<'a> {
    fn from(component: &'a Component) -> Self {
        Self {
            id: &component.id,
            name: &component.name,
            package: component.package.key.as_str(),
            instances: component.instance_count(),
        }
    }
}

#[derive(Serialize)]
struct JsonComponentList<'a> {
    total: usize,
    visible: usize,
    components: Vec<JsonComponent<'a>>,
}

/// Serializable package row for JSON output.
#[derive(Serialize)]
struct JsonPackage<'a> {
    key: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    components: usize,
}

#[derive(Serialize)]
struct JsonPackageList<'a> {
    packages: Vec<JsonPackage<'a>>,
}

/// Serializable value distribution for JSON output.
#[derive(Serialize)]
struct JsonValue<'a> {
    value: &'a str,
    count: usize,
    percentage: f64,
    filtered_count: usize,
}

#[derive(Serialize)]
struct JsonProp<'a> {
    key: &'a str,
    total_count: usize,
    total_percentage: f64,
    no_value_count: usize,
    values: Vec<JsonValue<'a>>,
}

/// Root structure of a prop report.
#[derive(Serialize)]
struct JsonPropReport<'a> {
    component: JsonComponent<'a>,
    filtered_instances: usize,
    props: Vec<JsonProp<'a>>,
}

fn component_list<'a>(report: &ComponentListReport<'a>) -> JsonComponentList<'a> {
    JsonComponentList {
        total: report.total,
        visible: report.components.len(),
        components: report.components.iter().map(|&c| c.into()).collect(),
    }
}

fn package_list(packages: &[PackageWithCount]) -> JsonPackageList<'_> {
    JsonPackageList {
        packages: packages
            .iter()
            .map(|p| JsonPackage {
                key: p.key.as_str(),
                kind: p.identity.kind().as_str(),
                name: p.identity.name(),
                version: p.identity.version(),
                components: p.count,
            })
            .collect(),
    }
}

fn prop_report<'a>(report: &PropReport<'a>) -> JsonPropReport<'a> {
    let filtered = report.filtered;
    let props = report
        .analysis
        .iter()
        .map(|prop| JsonProp {
            key: &prop.key,
            total_count: prop.total_count,
            total_percentage: prop.total_percentage,
            no_value_count: prop.no_value_count,
            values: prop
                .values
                .iter()
                .map(|v| JsonValue {
                    value: &v.value,
                    count: v.count,
                    percentage: v.percentage,
                    filtered_count: filtered.count(&prop.key, &v.value),
                })
                .collect(),
        })
        .collect();

    JsonPropReport {
        component: report.component.into(),
        filtered_instances: report.filtered_instances,
        props,
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, report: &Report<'_>, writer: &mut W) -> io::Result<()> {
        let json = match report {
            Report::Components(list) => serde_json::to_string_pretty(&component_list(list)),
            Report::Packages(packages) => serde_json::to_string_pretty(&package_list(packages)),
            Report::Props(props) => serde_json::to_string_pretty(&prop_report(props)),
        }
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
