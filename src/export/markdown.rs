//! Markdown export implementation.
//!
//! Exports explorer reports in Markdown format for documentation and reporting.

use super::{format_percentage, ComponentListReport, Exporter, PropReport, Report};
use crate::payload::PackageWithCount;
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

/// Escapes characters that would break a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn write_components<W: Write>(report: &ComponentListReport<'_>, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "# Components")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "**Showing:** {} of {}",
        report.components.len(),
        report.total
    )?;
    writeln!(writer)?;

    if report.components.is_empty() {
        writeln!(writer, "_No components match the current filters._")?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "| Component | Package | Instances |")?;
    writeln!(writer, "|-----------|---------|-----------|")?;
    for component in &report.components {
        writeln!(
            writer,
            "| {} | {} | {} |",
            cell(&component.name),
            cell(&component.package.identity.to_string()),
            component.instance_count()
        )?;
    }
    writeln!(writer)?;

    Ok(())
}

fn write_packages<W: Write>(packages: &[PackageWithCount], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "# Package Usage")?;
    writeln!(writer)?;
    writeln!(writer, "| Package | Type | Components |")?;
    writeln!(writer, "|---------|------|------------|")?;
    for package in packages {
        writeln!(
            writer,
            "| {} | {} | {} |",
            cell(&package.identity.to_string()),
            package.identity.kind(),
            package.count
        )?;
    }
    writeln!(writer)?;

    Ok(())
}

fn write_props<W: Write>(report: &PropReport<'_>, writer: &mut W) -> io::Result<()> {
    let component = report.component;

    writeln!(writer, "# {}", component.name)?;
    writeln!(writer)?;
    writeln!(writer, "**Package:** {}", component.package.identity)?;
    writeln!(
        writer,
        "**Instances:** {} of {}",
        report.filtered_instances,
        component.instance_count()
    )?;
    writeln!(writer)?;

    if report.analysis.is_empty() {
        writeln!(writer, "_No props are passed to this component._")?;
        writeln!(writer)?;
        return Ok(());
    }

    for prop in report.analysis {
        writeln!(
            writer,
            "## {} ({})",
            prop.key,
            format_percentage(prop.total_percentage)
        )?;
        writeln!(writer)?;

        if report.is_filtered() {
            writeln!(writer, "| Value | Count | Share | Filtered |")?;
            writeln!(writer, "|-------|-------|-------|----------|")?;
        } else {
            writeln!(writer, "| Value | Count | Share |")?;
            writeln!(writer, "|-------|-------|-------|")?;
        }

        for value in &prop.values {
            write!(
                writer,
                "| `{}` | {} | {} |",
                cell(&value.value),
                value.count,
                format_percentage(value.percentage)
            )?;
            if report.is_filtered() {
                write!(
                    writer,
                    " {} |",
                    report.filtered.count(&prop.key, &value.value)
                )?;
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, report: &Report<'_>, writer: &mut W) -> io::Result<()> {
        match report {
            Report::Components(list) => write_components(list, writer)?,
            Report::Packages(packages) => write_packages(packages, writer)?,
            Report::Props(props) => write_props(props, writer)?,
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by cuin*")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, analyze_filtered};
    use crate::export::fixtures;

    fn render(report: &Report<'_>) -> String {
        let mut output = Vec::new();
        MarkdownExporter.export(report, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_markdown_export_components() {
        let payload = fixtures::payload();
        let md_str = render(&Report::Components(ComponentListReport {
            components: payload.components.iter().collect(),
            total: payload.components.len(),
        }));

        assert!(md_str.contains("# Components"));
        assert!(md_str.contains("**Showing:** 2 of 2"));
        assert!(md_str.contains("| Button | ui@1.0.0 | 2 |"));
        assert!(md_str.contains("| div | native | 0 |"));
    }

    #[test]
    fn test_markdown_export_empty_components() {
        let payload = fixtures::payload();
        let md_str = render(&Report::Components(ComponentListReport {
            components: Vec::new(),
            total: payload.components.len(),
        }));

        assert!(md_str.contains("**Showing:** 0 of 2"));
        assert!(md_str.contains("No components match"));
        assert!(!md_str.contains("| Component |"));
    }

    #[test]
    fn test_markdown_export_packages() {
        let payload = fixtures::payload();
        let md_str = render(&Report::Packages(&payload.packages));

        assert!(md_str.contains("# Package Usage"));
        assert!(md_str.contains("| ui@1.0.0 | external | 1 |"));
        assert!(md_str.contains("| native | native | 1 |"));
    }

    #[test]
    fn test_markdown_export_props_unfiltered() {
        let payload = fixtures::payload();
        let button = fixtures::button(&payload);
        let analysis = analyze(&button.instances);
        let all: Vec<_> = button.instances.iter().collect();
        let filtered = analyze_filtered(&button.instances, &all);

        let md_str = render(&Report::Props(PropReport {
            component: button,
            analysis: &analysis,
            filtered: &filtered,
            filtered_instances: 2,
        }));

        assert!(md_str.contains("# Button"));
        assert!(md_str.contains("**Instances:** 2 of 2"));
        assert!(md_str.contains("## variant (100.0%)"));
        assert!(md_str.contains("| `\"outline\"` | 1 | 100.0% |"));
        assert!(md_str.contains("| `(no value)` | 1 | 50.0% |"));
        assert!(!md_str.contains("Filtered"));
    }

    #[test]
    fn test_markdown_export_props_filtered_column() {
        let payload = fixtures::payload();
        let button = fixtures::button(&payload);
        let analysis = analyze(&button.instances);
        let filtered = analyze_filtered(&button.instances, &[&button.instances[1]]);

        let md_str = render(&Report::Props(PropReport {
            component: button,
            analysis: &analysis,
            filtered: &filtered,
            filtered_instances: 1,
        }));

        assert!(md_str.contains("| Value | Count | Share | Filtered |"));
        assert!(md_str.contains("| `\"outline\"` | 1 | 100.0% | 0 |"));
        assert!(md_str.contains("| `(no value)` | 1 | 50.0% | 1 |"));
    }

    #[test]
    fn test_markdown_export_footer() {
        let payload = fixtures::payload();
        let md_str = render(&Report::Packages(&payload.packages));

        assert!(md_str.contains("---"));
        assert!(md_str.contains("*Generated by cuin*"));
    }

    #[test]
    fn test_cell_escapes_pipes() {
        assert_eq!(cell("a|b"), "a\\|b");
        assert_eq!(cell("a\nb"), "a b");
    }
}
