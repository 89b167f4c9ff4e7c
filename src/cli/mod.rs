pub mod init;
pub mod read;
pub mod run;
pub mod summary;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::pipeline::RunConfig;
use crate::settings::{load_settings, resolve_data_dir};

/// Build the run configuration from settings plus per-invocation flags.
pub(crate) fn run_config(
    data_dir: Option<&str>,
    starting_balance: Option<Decimal>,
    write_summary: bool,
) -> RunConfig {
    let settings = load_settings();
    let mut config = RunConfig::for_data_dir(&resolve_data_dir(data_dir, &settings));
    config.starting_balance = starting_balance.unwrap_or(settings.starting_balance);
    config.write_summary = write_summary || settings.summary;
    config
}

#[derive(Parser)]
#[command(
    name = "txmerge",
    about = "Merge debit and credit CSV exports into one deduplicated ledger."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the Debit/Credit/Config folder layout and remember the data directory.
    Init {
        /// Path for txmerge data (default: ~/Documents/txmerge)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Consolidate all batches and write the combined ledger.
    Run {
        /// Data directory (overrides settings)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Also write the per-category / per-month summary CSV
        #[arg(long)]
        summary: bool,
        /// Starting balance added to every net figure, e.g. 1500.00 or -20
        #[arg(long = "starting-balance", allow_hyphen_values = true)]
        starting_balance: Option<Decimal>,
    },
    /// Print the category summary without writing any files.
    Summary {
        /// Data directory (overrides settings)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Starting balance added to every net figure
        #[arg(long = "starting-balance", allow_hyphen_values = true)]
        starting_balance: Option<Decimal>,
        /// Month filter: YYYY-MM (default: all months)
        #[arg(long)]
        month: Option<String>,
    },
    /// Print the last combined ledger to stdout.
    Read {
        /// Data directory (overrides settings)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
}
