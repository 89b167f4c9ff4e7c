use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::audit::{AuditLog, EventKind};
use crate::error::{Result, TxMergeError};
use crate::models::Transaction;

pub const OVERALL_GROUP: &str = "ALL";
pub const TOTAL_CATEGORY: &str = "TOTAL";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| TxMergeError::InvalidAmount(format!("'{raw}': {e}")))
}

/// `YYYY-MM` bucket for an ISO date or date-time string. Offset-qualified
/// date-times bucket by their own local date, not by UTC.
pub fn period_key(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .or_else(|| {
                    OFFSET_FORMATS
                        .iter()
                        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
                })
                .map(|dt| dt.date_naive())
        })?;
    Some(format!("{:04}-{:02}", date.year(), date.month()))
}

/// Presentation rounding: two places, ties to even.
pub fn cents(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        .normalize()
}

pub fn format_cents(value: Decimal) -> String {
    format!("{:.2}", cents(value))
}

// ---------------------------------------------------------------------------
// Category summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryTotals {
    pub expense: Decimal,
    pub income: Decimal,
}

impl CategoryTotals {
    fn checked_add(&self, is_expense: bool, amount: Decimal) -> Option<Self> {
        let mut next = *self;
        if is_expense {
            next.expense = self.expense.checked_add(amount)?;
        } else {
            next.income = self.income.checked_add(amount)?;
        }
        Some(next)
    }

    /// Rounded `[expense, income, net, net_with_balance]`, or `None` when a
    /// figure falls outside the decimal range.
    fn presented(&self, starting_balance: Decimal) -> Option<[Decimal; 4]> {
        let expense = cents(self.expense);
        let income = cents(self.income);
        let net = income.checked_sub(expense)?;
        let net_with_balance = net.checked_add(cents(starting_balance))?;
        Some([expense, income, net, net_with_balance])
    }
}

/// Expense/income per category for one scope, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub categories: Vec<(String, CategoryTotals)>,
    pub total: CategoryTotals,
    pub starting_balance: Decimal,
}

/// Accumulates one scope. A record whose amount does not parse, or whose
/// amount would push a total (or its net) out of decimal range, is left out
/// and reported as `InvalidAmount`.
pub fn summarize<'a>(
    rows: impl IntoIterator<Item = &'a Transaction>,
    starting_balance: Decimal,
    audit: &mut AuditLog,
) -> Summary {
    let mut summary = Summary {
        starting_balance,
        ..Summary::default()
    };
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in rows {
        let amount = match parse_amount(&tx.amount) {
            Ok(a) => a,
            Err(e) => {
                audit.record(
                    EventKind::InvalidAmount,
                    format!("Skipped transaction with invalid Amount on {}: {e}", tx.date),
                );
                continue;
            }
        };
        let is_expense = tx.is_expense();
        let slot = index.get(tx.category.as_str()).copied();
        let current = slot.map(|i| summary.categories[i].1).unwrap_or_default();

        let accepted = current
            .checked_add(is_expense, amount)
            .zip(summary.total.checked_add(is_expense, amount))
            .filter(|(category, total)| {
                category.presented(starting_balance).is_some()
                    && total.presented(starting_balance).is_some()
            });
        let Some((category, total)) = accepted else {
            audit.record(
                EventKind::InvalidAmount,
                format!(
                    "Skipped transaction with out-of-range Amount on {}: '{}'",
                    tx.date, tx.amount
                ),
            );
            continue;
        };

        match slot {
            Some(i) => summary.categories[i].1 = category,
            None => {
                index.insert(tx.category.as_str(), summary.categories.len());
                summary.categories.push((tx.category.clone(), category));
            }
        }
        summary.total = total;
    }
    summary
}

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// One line of the summary table, already rounded for presentation.
///
/// `net` and `net_with_balance` derive from the rounded expense, income and
/// starting balance, so `expense + net == income` holds exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub group: String,
    pub category: String,
    pub expense: Decimal,
    pub income: Decimal,
    pub net: Decimal,
    pub net_with_balance: Decimal,
}

impl SummaryRow {
    fn new(group: &str, category: &str, totals: &CategoryTotals, starting_balance: Decimal) -> Option<Self> {
        let [expense, income, net, net_with_balance] = totals.presented(starting_balance)?;
        Some(Self {
            group: group.to_string(),
            category: category.to_string(),
            expense,
            income,
            net,
            net_with_balance,
        })
    }

    pub fn to_record(&self) -> [String; 6] {
        [
            self.group.clone(),
            self.category.clone(),
            format_cents(self.expense),
            format_cents(self.income),
            format_cents(self.net),
            format_cents(self.net_with_balance),
        ]
    }
}

impl Summary {
    /// Category rows followed by the `TOTAL` row.
    pub fn rows(&self, group: &str) -> Vec<SummaryRow> {
        // `summarize` only admits amounts whose totals stay in range, so no
        // row is dropped here.
        self.categories
            .iter()
            .map(|(name, totals)| (name.as_str(), totals))
            .chain(std::iter::once((TOTAL_CATEGORY, &self.total)))
            .filter_map(|(name, totals)| SummaryRow::new(group, name, totals, self.starting_balance))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Overall + monthly report
// ---------------------------------------------------------------------------

pub struct SummaryReport {
    pub starting_balance: Decimal,
    pub overall: Summary,
    /// `(YYYY-MM, summary)` in ascending label order.
    pub periods: Vec<(String, Summary)>,
}

impl SummaryReport {
    pub fn build(rows: &[Transaction], starting_balance: Decimal, audit: &mut AuditLog) -> Self {
        let overall = summarize(rows, starting_balance, audit);

        let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
        for tx in rows {
            match period_key(&tx.date) {
                Some(key) => groups.entry(key).or_default().push(tx),
                None => audit.record(
                    EventKind::InvalidDate,
                    format!("Invalid Date format '{}', skipping for summary", tx.date),
                ),
            }
        }

        let periods = groups
            .into_iter()
            .map(|(key, txs)| {
                let summary = summarize(txs, starting_balance, audit);
                (key, summary)
            })
            .collect();

        Self {
            starting_balance,
            overall,
            periods,
        }
    }

    /// Every output row: the `ALL` scope first, then each period.
    pub fn rows(&self) -> Vec<SummaryRow> {
        let mut rows = self.overall.rows(OVERALL_GROUP);
        for (key, summary) in &self.periods {
            rows.extend(summary.rows(key));
        }
        rows
    }
}
