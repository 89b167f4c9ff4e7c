use rust_decimal::Decimal;

use crate::audit::{AuditLog, EventKind};
use crate::cli::run_config;
use crate::error::Result;
use crate::pipeline;

pub fn run(data_dir: Option<&str>, summary: bool, starting_balance: Option<Decimal>) -> Result<()> {
    let config = run_config(data_dir, starting_balance, summary);
    let mut audit = AuditLog::new();

    let outcome = pipeline::run_and_log(&config, &mut audit)?;

    println!(
        "{} loaded, {} written, {} duplicates, {} skipped (automatic payments)",
        outcome.loaded,
        outcome.written,
        audit.count(EventKind::DuplicateRemoved),
        audit.count(EventKind::AutomaticPaymentSkipped),
    );
    println!("Ledger: {}", config.ledger_path().display());
    if outcome.summary.is_some() {
        println!("Summary: {}", config.summary_path().display());
    }
    if outcome.archived > 0 {
        println!("{} previous result file(s) archived", outcome.archived);
    }
    let warnings = audit.events().iter().filter(|e| e.kind.is_warning()).count();
    if warnings > 0 {
        println!("{warnings} warning(s), see {}", config.log_file.display());
    }
    Ok(())
}
