use colored::Colorize;
use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::audit::AuditLog;
use crate::cli::run_config;
use crate::error::{Result, TxMergeError};
use crate::fmt::money;
use crate::pipeline::load_and_consolidate;
use crate::reports::{Summary, SummaryReport, OVERALL_GROUP, TOTAL_CATEGORY};

pub fn run(data_dir: Option<&str>, starting_balance: Option<Decimal>, month: Option<String>) -> Result<()> {
    let config = run_config(data_dir, starting_balance, true);
    let mut audit = AuditLog::new();
    let consolidated = load_and_consolidate(&config, &mut audit)?;
    let report = SummaryReport::build(&consolidated.rows, config.starting_balance, &mut audit);

    match month {
        Some(m) => {
            let (_, summary) = report
                .periods
                .iter()
                .find(|(key, _)| *key == m)
                .ok_or_else(|| TxMergeError::Other(format!("No transactions for {m}")))?;
            print_scope(&m, summary);
        }
        None => {
            print_scope(OVERALL_GROUP, &report.overall);
            for (key, summary) in &report.periods {
                println!();
                print_scope(key, summary);
            }
        }
    }
    Ok(())
}

fn print_scope(group: &str, summary: &Summary) {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Expense", "Income", "Net", "Net + Start"]);

    for row in summary.rows(group) {
        let is_total = row.category == TOTAL_CATEGORY;
        let label = if is_total {
            Cell::new(row.category.as_str().bold())
        } else {
            Cell::new(&row.category)
        };
        let net = if row.net.is_sign_negative() && !row.net.is_zero() {
            money(row.net).red()
        } else {
            money(row.net).green()
        };
        table.add_row(vec![
            label,
            Cell::new(money(row.expense)),
            Cell::new(money(row.income)),
            Cell::new(net),
            Cell::new(money(row.net_with_balance)),
        ]);
    }

    println!("{}\n{table}", group.bold());
}
