//! Plain text export implementation.
//!
//! Renders explorer reports as aligned columns for terminal output. Prop
//! values are drawn as a tree under their key.

use super::{format_percentage, ComponentListReport, Exporter, PropReport, Report};
use crate::payload::PackageWithCount;
use std::io::{self, Write};

/// Plain text exporter implementation.
pub struct TextExporter;

/// Branch connector for one child row.
fn branch(is_last: bool) -> &'static str {
    if is_last {
        "└── "
    } else {
        "├── "
    }
}

/// Width of the widest entry, at least `min`.
fn column_width<'a>(entries: impl Iterator<Item = &'a str>, min: usize) -> usize {
    entries.map(|s| s.chars().count()).fold(min, usize::max)
}

fn write_components<W: Write>(report: &ComponentListReport<'_>, writer: &mut W) -> io::Result<()> {
    writeln!(
        writer,
        "Components ({} of {})",
        report.components.len(),
        report.total
    )?;

    let packages: Vec<String> = report
        .components
        .iter()
        .map(|c| c.package.identity.to_string())
        .collect();
    let name_width = column_width(report.components.iter().map(|c| c.name.as_str()), 9);
    let package_width = column_width(packages.iter().map(String::as_str), 7);

    for (component, package) in report.components.iter().zip(&packages) {
        writeln!(
            writer,
            "  {:<name_width$}  {:<package_width$}  {:>5}",
            component.name,
            package,
            component.instance_count(),
        )?;
    }

    Ok(())
}

fn write_packages<W: Write>(packages: &[PackageWithCount], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "Packages ({})", packages.len())?;

    let names: Vec<String> = packages.iter().map(|p| p.identity.to_string()).collect();
    let width = column_width(names.iter().map(String::as_str), 7);

    for (package, name) in packages.iter().zip(&names) {
        writeln!(
            writer,
            "  {:<width$}  {:<8}  {:>5}",
            name,
            package.identity.kind(),
            package.count,
        )?;
    }

    Ok(())
}

fn write_props<W: Write>(report: &PropReport<'_>, writer: &mut W) -> io::Result<()> {
    let component = report.component;
    writeln!(
        writer,
        "{} ({}) - {} of {} instances",
        component.name,
        component.package.identity,
        report.filtered_instances,
        component.instance_count()
    )?;

    for prop in report.analysis {
        writeln!(
            writer,
            "{}  {} uses  {}",
            prop.key,
            prop.total_count,
            format_percentage(prop.total_percentage)
        )?;

        let width = column_width(prop.values.iter().map(|v| v.value.as_str()), 0);
        let last = prop.values.len().saturating_sub(1);
        for (i, value) in prop.values.iter().enumerate() {
            write!(
                writer,
                "{}{:<width$}  {:>5}  {:>6}",
                branch(i == last),
                value.value,
                value.count,
                format_percentage(value.percentage),
            )?;
            if report.is_filtered() {
                write!(
                    writer,
                    "  [{} filtered]",
                    report.filtered.count(&prop.key, &value.value)
                )?;
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}

impl Exporter for TextExporter {
    fn export<W: Write>(&self, report: &Report<'_>, writer: &mut W) -> io::Result<()> {
        match report {
            Report::Components(list) => write_components(list, writer),
            Report::Packages(packages) => write_packages(packages, writer),
            Report::Props(props) => write_props(props, writer),
        }
    }
}
