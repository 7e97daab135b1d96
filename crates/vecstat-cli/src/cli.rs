//! CLI argument definitions for vecstat.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Fetch and normalize vectors |
//! | `export` | Fetch vectors and write the pivot as CSV |
//! | `catalog` | Browse the product catalog |
//! | `chart` | Build chart datasets for vectors |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `VECSTAT_TIMEOUT_MS` or `30000` | Upstream timeout |
//! | `--upstream-url` | `VECSTAT_UPSTREAM_URL` or WDS | Vector endpoint |
//! | `--catalog` | `VECSTAT_CATALOG` or `data.json` | Catalog file |
//!
//! # Examples
//!
//! ```bash
//! vecstat fetch v41690973 v41690914 --latest-n 12 --format table
//! vecstat export v41690973 --output cpi.csv
//! vecstat catalog price
//! vecstat chart v41690973 --chart-type bar --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use vecstat_core::{ChartType, DEFAULT_CSV_FILE_NAME, DEFAULT_OBSERVATION_COUNT};

/// Statistics Canada vector data from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "vecstat",
    author,
    version,
    about = "Statistics Canada vector data CLI",
    long_about = "Fetches time series from the Statistics Canada Web Data Service by vector \
id, aligns them by reference period and exports them as CSV.\n\
\n\
Use 'vecstat <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Upstream request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Vector endpoint to POST batches to.
    #[arg(long, global = true)]
    pub upstream_url: Option<String>,

    /// Path of the product catalog JSON file.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON envelope.
    Json,
    /// Metadata header followed by an aligned table.
    Table,
    /// The pivot table as CSV (fetch and export only).
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
}

impl From<ChartKind> for ChartType {
    fn from(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Line => ChartType::Line,
            ChartKind::Bar => ChartType::Bar,
            ChartKind::Scatter => ChartType::Scatter,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the latest observations of one or more vectors.
    ///
    /// # Examples
    ///
    ///   vecstat fetch v41690973
    ///   vecstat fetch v41690973 41690914 --latest-n 12 --format table
    Fetch(FetchArgs),

    /// Fetch vectors and write their aligned table to a CSV file.
    ///
    /// # Examples
    ///
    ///   vecstat export v41690973 v41690914
    ///   vecstat export v41690973 --output cpi.csv
    Export(ExportArgs),

    /// List catalog products matching a query, or one product's vectors.
    ///
    /// # Examples
    ///
    ///   vecstat catalog
    ///   vecstat catalog "consumer price"
    ///   vecstat catalog --product 18100004
    Catalog(CatalogArgs),

    /// Build chart-ready datasets for vectors.
    ///
    /// # Examples
    ///
    ///   vecstat chart v41690973 --chart-type scatter
    Chart(ChartArgs),
}

/// Vectors and history depth shared by the fetching commands.
#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Vector ids, with or without the leading 'v'.
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    /// Number of most recent observations per vector.
    #[arg(long, default_value_t = DEFAULT_OBSERVATION_COUNT)]
    pub latest_n: u32,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub series: SeriesArgs,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Destination file.
    #[arg(long, short, default_value = DEFAULT_CSV_FILE_NAME)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Case-insensitive match on product id or description.
    pub query: Option<String>,

    /// Show the vectors of this product instead of the product list.
    #[arg(long)]
    pub product: Option<String>,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    pub chart_type: ChartKind,
}
