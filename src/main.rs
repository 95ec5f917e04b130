use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use cuin::config::ExplorerConfig;
use cuin::export::{export, ComponentListReport, ExportFormat, PropReport, Report};
use cuin::filter::SortOption;
use cuin::payload::TransformedPayload;
use cuin::schema::parse_file;
use cuin::store::{ComponentFilterStore, InstanceFilterStore};

#[derive(Parser)]
#[command(name = "cuin")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Explore how UI components and their props are used across a codebase", long_about = None)]
struct Cli {
    /// Log filter decisions and payload statistics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List components, filtered by name and package
    Components {
        /// Path to the usage payload (JSON)
        payload: PathBuf,

        /// Case-insensitive substring of the component name
        #[arg(short, long)]
        query: Option<String>,

        /// Hide components of this package key (repeatable)
        #[arg(short, long = "exclude", value_name = "KEY")]
        exclude: Vec<String>,

        /// Sort order: name-asc, name-desc, usage-asc, usage-desc
        #[arg(short, long)]
        sort: Option<SortOption>,

        /// Output format: text, json, markdown
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,
    },
    /// Show how many components each package provides
    Packages {
        /// Path to the usage payload (JSON)
        payload: PathBuf,

        /// Output format: text, json, markdown
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,
    },
    /// Analyze prop usage of one component
    Props {
        /// Path to the usage payload (JSON)
        payload: PathBuf,

        /// Component id
        #[arg(short, long)]
        component: String,

        /// Hide usage sites from this package name (repeatable)
        #[arg(long = "exclude-package", value_name = "NAME")]
        exclude_packages: Vec<String>,

        /// Keep only usage sites where KEY has VALUE (repeatable)
        #[arg(long = "only", value_name = "KEY=VALUE")]
        only: Vec<String>,

        /// Output format: text, json, markdown
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,
    },
    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("cuin=debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load(path: &Path) -> Result<TransformedPayload> {
    let payload = parse_file(path)
        .with_context(|| format!("Failed to load payload from {}", path.display()))?;
    let payload = TransformedPayload::from_payload(payload);
    info!(
        "Loaded {} components from {}",
        payload.components.len(),
        payload.meta.base_path
    );
    Ok(payload)
}

/// Splits `KEY=VALUE` at the first `=`.
fn parse_only(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid --only filter '{}': expected KEY=VALUE", arg),
    }
}

fn write_report(format: ExportFormat, report: &Report<'_>) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    export(format, report, &mut handle).context("Failed to write report")
}

fn run_components(
    path: &Path,
    query: Option<String>,
    exclude: &[String],
    sort: Option<SortOption>,
    format: ExportFormat,
) -> Result<()> {
    let payload = load(path)?;
    let config = match sort {
        Some(sort) => ExplorerConfig::default().with_default_sort(sort),
        None => ExplorerConfig::default(),
    };

    let mut store = ComponentFilterStore::new(payload.package_keys(), &config);
    if let Some(query) = query {
        store.set_name_query(query);
    }
    for raw in exclude {
        match payload.package_keys().into_iter().find(|k| k.as_str() == raw.as_str()) {
            Some(key) => store.toggle_package(&key),
            None => warn!("Unknown package key '{}', ignoring", raw),
        }
    }

    let report = Report::Components(ComponentListReport {
        components: store.visible_components(&payload.components),
        total: payload.components.len(),
    });
    write_report(format, &report)
}

fn run_props(
    path: &Path,
    component_id: &str,
    exclude_packages: &[String],
    only: &[String],
    format: ExportFormat,
) -> Result<()> {
    let payload = load(path)?;
    let Some(component) = payload.component(component_id) else {
        bail!("No component with id '{}'", component_id);
    };

    let mut store = InstanceFilterStore::new(&component.instances);
    for name in exclude_packages {
        if !store.available_packages().iter().any(|p| &p.name == name) {
            warn!("Component has no usage sites from package '{}'", name);
        }
        store.toggle_package(name);
    }

    let mut wanted: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for arg in only {
        let (key, value) = parse_only(arg)?;
        wanted.entry(key).or_default().push(value);
    }
    for (key, values) in wanted {
        if store.all_values_count(key) == 0 {
            warn!("Component has no prop '{}', ignoring filter", key);
            continue;
        }
        for value in values.iter().filter(|v| !store.has_value(key, v)) {
            warn!("Prop '{}' never takes value {}, it matches nothing", key, value);
        }
        store.select_only_values(key, values);
    }

    let filtered = store.filtered_prop_counts();
    let report = Report::Props(PropReport {
        component,
        analysis: store.props_analysis(),
        filtered: &filtered,
        filtered_instances: store.filtered_instances().len(),
    });
    write_report(format, &report)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Components {
            payload,
            query,
            exclude,
            sort,
            format,
        }) => run_components(&payload, query, &exclude, sort, format),
        Some(Commands::Packages { payload, format }) => {
            let payload = load(&payload)?;
            write_report(format, &Report::Packages(&payload.packages))
        }
        Some(Commands::Props {
            payload,
            component,
            exclude_packages,
            only,
            format,
        }) => run_props(&payload, &component, &exclude_packages, &only, format),
        Some(Commands::Version) => {
            println!("cuin v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("cuin - Component Usage Explorer");
            println!("Run 'cuin components <payload>' to list components");
            println!("Run 'cuin --help' for more information");
            Ok(())
        }
    }
}
