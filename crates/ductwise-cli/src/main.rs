mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "ductwise",
    version,
    about = "Duct-wise shipping summary and master sheet from packaging list workbooks"
)]
struct Cli {
    /// Log debug detail (overridden by RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Input workbooks plus the unit/vendor selections.
#[derive(Args)]
pub struct InputArgs {
    /// Shipping list workbook(s); every sheet of every file is read
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Keep only these Unit No values (repeatable; default: all)
    #[arg(short, long = "unit", value_name = "UNIT")]
    pub units: Vec<String>,

    /// Then keep only these Vendor Name values (repeatable; default: all)
    #[arg(short, long = "vendor", value_name = "VENDOR")]
    pub vendors: Vec<String>,

    /// Reuse parsed workbooks and rendered reports from this directory
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the duct-wise summary and master sheet and write them as xlsx
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Directory for duct_summary_detailed.xlsx and duct_master_sheet.xlsx
        #[arg(short = 'O', long = "out-dir", value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show the filtered input rows with their derived keys
    Preview {
        #[command(flatten)]
        input: InputArgs,

        /// Maximum rows to show
        #[arg(short, long, default_value_t = 200)]
        limit: usize,
    },
    /// List the Unit No and Vendor Name values available for filtering
    Options {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Manage the report cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove every cached workbook and report
    Clear {
        /// Cache directory
        #[arg(long, value_name = "DIR")]
        cache_dir: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Report {
            input,
            out_dir,
            output,
        } => commands::report::run(&input, &out_dir, &output),
        Commands::Preview { input, limit } => commands::preview::run(&input, limit),
        Commands::Options { input } => commands::options::run(&input),
        Commands::Cache { action } => match action {
            CacheAction::Clear { cache_dir } => commands::cache::clear(&cache_dir),
        },
    };

    if let Err(e) = result {
        if e.is_empty_result() {
            eprintln!("Warning: {e}");
            return;
        }
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
