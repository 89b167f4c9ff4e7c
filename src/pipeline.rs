use std::path::{Path, PathBuf};

use log::{info, warn};
use rust_decimal::Decimal;

use crate::audit::AuditLog;
use crate::dedup::deduplicate;
use crate::error::Result;
use crate::ignore::IgnorePatterns;
use crate::loader::load_all;
use crate::models::Transaction;
use crate::normalizer::Normalizer;
use crate::reports::SummaryReport;
use crate::writer::{archive_existing_results, write_ledger, write_summary};

pub const OUTPUT_FILENAME: &str = "combined_transactions.csv";
pub const SUMMARY_OUTPUT_FILENAME: &str = "combined_transactions_with_summary.csv";
pub const IGNORE_FILENAME: &str = "ignores.txt";
pub const LOG_FILENAME: &str = "log.txt";

/// Everything one run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub result_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub ignore_file: PathBuf,
    pub log_file: PathBuf,
    pub starting_balance: Decimal,
    pub write_summary: bool,
}

impl RunConfig {
    /// Standard layout: `Debit/`, `Credit/`, `Result/`, `Archive/`,
    /// `Config/ignores.txt` and `log.txt` under one data directory.
    pub fn for_data_dir(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            result_dir: data_dir.join("Result"),
            archive_dir: data_dir.join("Archive"),
            ignore_file: data_dir.join("Config").join(IGNORE_FILENAME),
            log_file: data_dir.join(LOG_FILENAME),
            starting_balance: Decimal::ZERO,
            write_summary: false,
        }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.result_dir.join(OUTPUT_FILENAME)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.result_dir.join(SUMMARY_OUTPUT_FILENAME)
    }
}

pub struct Consolidated {
    pub loaded: usize,
    pub rows: Vec<Transaction>,
}

/// Normalize, deduplicate and filter loaded rows. Pure apart from `audit`.
pub fn consolidate(
    rows: Vec<Transaction>,
    patterns: &IgnorePatterns,
    audit: &mut AuditLog,
) -> Result<Vec<Transaction>> {
    let normalizer = Normalizer::new()?;
    let cleaned = normalizer.normalize_all(rows, audit);
    let unique = deduplicate(cleaned, audit);
    Ok(patterns.apply(unique, audit))
}

/// Load every batch and consolidate, without touching output files.
pub fn load_and_consolidate(config: &RunConfig, audit: &mut AuditLog) -> Result<Consolidated> {
    let raw = load_all(&config.data_dir)?;
    let loaded = raw.len();
    let patterns = IgnorePatterns::load(&config.ignore_file, audit);
    if !patterns.is_empty() {
        info!("{} ignore pattern(s) from {}", patterns.len(), config.ignore_file.display());
    }
    let rows = consolidate(raw, &patterns, audit)?;
    Ok(Consolidated { loaded, rows })
}

pub struct RunOutcome {
    pub loaded: usize,
    pub written: usize,
    pub archived: usize,
    pub summary: Option<SummaryReport>,
}

/// Full run: consolidate, archive old results, write new ones.
pub fn run(config: &RunConfig, audit: &mut AuditLog) -> Result<RunOutcome> {
    let Consolidated { loaded, rows } = load_and_consolidate(config, audit)?;

    std::fs::create_dir_all(&config.result_dir)?;
    let archived = archive_existing_results(&config.result_dir, &config.archive_dir, audit)?;
    write_ledger(&config.ledger_path(), &rows, audit)?;

    let summary = if config.write_summary {
        let report = SummaryReport::build(&rows, config.starting_balance, audit);
        write_summary(&config.summary_path(), &report, audit)?;
        Some(report)
    } else {
        None
    };

    Ok(RunOutcome {
        loaded,
        written: rows.len(),
        archived: archived.len(),
        summary,
    })
}

/// `run`, then append the audit events to the run log. A pipeline failure
/// wins over a log failure; a log failure alone is only warned about.
pub fn run_and_log(config: &RunConfig, audit: &mut AuditLog) -> Result<RunOutcome> {
    let result = run(config, audit);
    if let Err(e) = audit.append_to(&config.log_file) {
        warn!("Could not append to {}: {e}", config.log_file.display());
    }
    result
}
