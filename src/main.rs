// Entry point and high-level CLI flow.
//
// - `snapshot` loads and cleans the CSV export, prints diagnostics and
//   writes the static data table.
// - `clients` lists every client with its compliance and discount tier.
// - `report` renders one client's dashboard as tables, JSON or CSV.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use compliance_report::config::Config;
use compliance_report::format::format_currency;
use compliance_report::reports::{self, ClientReport};
use compliance_report::snapshot::{self, Snapshot};
use compliance_report::store::RecordStore;
use compliance_report::{loader, output, util};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "compliance_report")]
#[command(author, version, about = "Sales objective compliance and discount tier reports", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./compliance_report.toml when present)
    #[arg(short, long, global = true, env = "COMPLIANCE_REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a CSV export and write the static data snapshot
    Snapshot {
        /// CSV export of the weekly progress sheet
        #[arg(value_name = "CSV")]
        file: PathBuf,

        /// Snapshot file to write
        #[arg(short, long, default_value = "datos.json")]
        output: PathBuf,
    },

    /// List clients with compliance and discount tier
    Clients {
        /// CSV export or JSON snapshot
        #[arg(value_name = "SOURCE")]
        file: PathBuf,
    },

    /// Report for one client
    Report {
        /// CSV export or JSON snapshot
        #[arg(value_name = "SOURCE")]
        file: PathBuf,

        /// Client name (defaults to the first client alphabetically)
        #[arg(long)]
        client: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Directory for exported files (overrides the config file; json and
        /// csv only, table output goes to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn open_store(path: &Path, config: &Config) -> Result<RecordStore> {
    let (store, load_report) = snapshot::open_source(path, &config.ingest.client_marker)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    if load_report.parse_errors > 0 {
        eprintln!(
            "Warning: {} rows in {} could not be decoded; totals below exclude them.\n",
            util::format_int(load_report.parse_errors),
            path.display()
        );
    }
    Ok(store)
}

/// Where `json`/`csv` exports go. Table output has no files, so a given
/// `--output` is reported and ignored.
fn export_dir(format: Format, out_dir: Option<&Path>, config: &Config) -> Option<PathBuf> {
    if format == Format::Table {
        if let Some(dir) = out_dir {
            warn!(dir = %dir.display(), "--output has no effect with --format table");
        }
        return None;
    }
    Some(out_dir.map_or_else(|| PathBuf::from(&config.output.dir), Path::to_path_buf))
}

/// Load and clean the CSV, print a short summary, write the snapshot.
fn handle_snapshot(file: &Path, out: &Path, config: &Config) -> Result<()> {
    let (records, load_report) = loader::load_and_clean(file, &config.ingest.client_marker)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    println!(
        "Processing dataset... ({} rows read, {} branches kept)",
        util::format_int(load_report.total_rows),
        util::format_int(load_report.kept_rows)
    );
    println!(
        "Note: {} rows skipped without a client marker, {} undecodable.",
        util::format_int(load_report.skipped_rows),
        util::format_int(load_report.parse_errors)
    );
    if load_report.coerced_fields > 0 {
        println!(
            "Info: {} non-numeric cells replaced with 0.",
            util::format_int(load_report.coerced_fields)
        );
    }
    println!("{} distinct clients.\n", util::format_int(load_report.clients));

    let snap = Snapshot::from_store(&RecordStore::new(records));
    snapshot::write_snapshot(out, &snap)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Snapshot saved to {}", out.display());
    Ok(())
}

fn handle_clients(file: &Path, config: &Config) -> Result<()> {
    let store = open_store(file, config)?;
    let rules = config.tier_rules()?;
    let rows = reports::generate_directory(&store, &rules);
    output::preview_table(
        "Client Directory",
        Some(format!("{} branches", util::format_int(store.len())).as_str()),
        &rows,
        rows.len().max(1),
    );
    Ok(())
}

fn print_report(report: &ClientReport, preview_rows: usize) {
    println!(
        "Client: {} | {} branches | Discount {}% ({}, {})\n",
        report.client,
        report.branches,
        report.discount.tier,
        report.discount.label,
        report.discount_color
    );
    output::preview_table("Key Figures", None, &report.kpis, report.kpis.len());
    output::preview_table("Progress by Category", None, &report.categories, report.categories.len());
    println!(
        "Global Completion: {} (achieved {}, pending {})\n",
        report.ring.center_label,
        format_currency(report.ring.achieved),
        format_currency(report.ring.pending)
    );
    output::preview_table("Detail by Branch", None, &report.detail, preview_rows);
    for o in &report.observations {
        println!(
            "Data check: declared {:?} total {} differs from category sum {}",
            o.kind,
            format_currency(o.declared),
            format_currency(o.components)
        );
    }
    println!("Note: {}", report.note);
}

fn handle_report(
    file: &Path,
    client: Option<&str>,
    format: Format,
    out_dir: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let store = open_store(file, config)?;
    let rules = config.tier_rules()?;
    let Some(client) = reports::select_client(&store, client) else {
        println!("No clients found in {}.", file.display());
        return Ok(());
    };
    let report = reports::generate_client_report(&store, &client, &rules);
    info!(client = %report.client, tier = report.discount.tier, "report generated");

    let Some(dir) = export_dir(format, out_dir, config) else {
        print_report(&report, config.output.preview_rows);
        return Ok(());
    };
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let slug = util::slugify(&report.client);
    if format == Format::Json {
        let path = dir.join(format!("{}_summary.json", slug));
        output::write_json(&path, &report)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Summary exported to {}", path.display());
    } else {
        let path = dir.join(format!("{}_branches.csv", slug));
        output::write_csv(&path, &report.detail)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Branch detail exported to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::discover(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Snapshot { file, output } => handle_snapshot(&file, &output, &config),
        Commands::Clients { file } => handle_clients(&file, &config),
        Commands::Report {
            file,
            client,
            format,
            output,
        } => handle_report(&file, client.as_deref(), format, output.as_deref(), &config),
    }
}
