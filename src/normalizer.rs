use regex::Regex;

use crate::audit::{AuditLog, EventKind};
use crate::error::{Result, TxMergeError};
use crate::models::Transaction;

const AUTOMATIC_PAYMENT: &str = "AUTOMATIC PAYMENT";

/// Repairs dirty ids and drops automatic-payment rows.
pub struct Normalizer {
    scientific: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self> {
        let scientific = Regex::new(r"^[+-]?\d+(?:\.\d+)?[eE][+-]?\d+$")
            .map_err(|e| TxMergeError::Other(e.to_string()))?;
        Ok(Self { scientific })
    }

    /// Returns `None` when the row should be dropped.
    ///
    /// Order matters: the automatic-payment check runs on the original tag,
    /// and scientific ids are expanded before the alphabetic check so the
    /// exponent marker is not mistaken for a letter.
    pub fn normalize(&self, mut tx: Transaction, audit: &mut AuditLog) -> Option<Transaction> {
        if tx.tag.to_uppercase().starts_with(AUTOMATIC_PAYMENT) {
            audit.record(
                EventKind::AutomaticPaymentSkipped,
                format!(
                    "Skipped AUTOMATIC PAYMENT entry: {{'Date': '{}', 'ID': '{}', 'Tag': '{}'}}",
                    tx.date, tx.id, tx.tag
                ),
            );
            return None;
        }

        if self.scientific.is_match(&tx.id) {
            match expand_scientific(&tx.id) {
                Ok(expanded) => {
                    audit.record(
                        EventKind::IdExpanded,
                        format!(
                            "Expanded scientific ID '{}' to '{}' for Date {}",
                            tx.id, expanded, tx.date
                        ),
                    );
                    tx.id = expanded;
                }
                Err(e) => audit.record(
                    EventKind::IdExpansionFailed,
                    format!("Error expanding scientific ID '{}': {e}", tx.id),
                ),
            }
        }

        if tx.id.chars().any(char::is_alphabetic) {
            let original = std::mem::replace(&mut tx.id, "0".to_string());
            if !tx.tag.split_whitespace().any(|part| part == original) {
                tx.tag = format!("{} {}", tx.tag, original).trim().to_string();
            }
            audit.record(
                EventKind::IdReplaced,
                format!(
                    "Replaced alphabetic ID '{}' with '0' and updated Tag to '{}' for Date {}",
                    original, tx.tag, tx.date
                ),
            );
        }

        Some(tx)
    }

    pub fn normalize_all(&self, rows: Vec<Transaction>, audit: &mut AuditLog) -> Vec<Transaction> {
        rows.into_iter()
            .filter_map(|tx| self.normalize(tx, audit))
            .collect()
    }
}

/// Widest integer an id may expand to.
const MAX_EXPANDED_DIGITS: usize = 1024;

/// `1.23E+5` -> `123000`. Fractions round half-even to an integer.
///
/// Works on the digit string, so any exponent that fits in
/// `MAX_EXPANDED_DIGITS` expands exactly.
pub fn expand_scientific(raw: &str) -> Result<String> {
    let malformed = || TxMergeError::Other(format!("malformed scientific notation '{raw}'"));

    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let (mantissa, exponent) = unsigned.split_once(|c: char| c == 'e' || c == 'E').ok_or_else(malformed)?;
    let exponent: i64 = exponent.parse().map_err(|_| malformed())?;
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let digits: Vec<u8> = whole.bytes().chain(fraction.bytes()).map(|b| b - b'0').collect();
    let point = (whole.len() as i64).saturating_add(exponent);
    if point > (digits.len() + MAX_EXPANDED_DIGITS) as i64 {
        return Err(TxMergeError::Other(format!(
            "exponent of '{raw}' expands past {MAX_EXPANDED_DIGITS} digits"
        )));
    }

    let mut integer: Vec<u8> = if point <= 0 {
        Vec::new()
    } else if point as usize >= digits.len() {
        let mut padded = digits.clone();
        padded.resize(point as usize, 0);
        padded
    } else {
        digits[..point as usize].to_vec()
    };

    // Digits after the point; a negative point means leading zeros, which
    // always round down.
    let rest: &[u8] = match point {
        p if p < 0 => &[],
        p if (p as usize) < digits.len() => &digits[p as usize..],
        _ => &[],
    };
    let round_up = match rest.split_first() {
        Some((&first, _)) if first > 5 => true,
        Some((&5, tail)) if tail.iter().any(|&d| d != 0) => true,
        Some((&5, _)) => integer.last().is_some_and(|d| d % 2 == 1),
        _ => false,
    };
    if round_up {
        increment(&mut integer);
    }

    let text: String = integer
        .iter()
        .skip_while(|&&d| d == 0)
        .map(|&d| char::from(b'0' + d))
        .collect();
    Ok(match (text.is_empty(), negative) {
        (true, _) => "0".to_string(),
        (false, true) => format!("-{text}"),
        (false, false) => text,
    })
}

fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}
