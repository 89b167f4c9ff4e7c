use std::collections::HashSet;

use crate::audit::{AuditLog, EventKind};
use crate::models::{IdentityKey, Transaction};

/// Keep the first occurrence of every identity key, in input order.
pub fn deduplicate(rows: Vec<Transaction>, audit: &mut AuditLog) -> Vec<Transaction> {
    let mut seen: HashSet<IdentityKey> = HashSet::with_capacity(rows.len());
    let mut unique = Vec::with_capacity(rows.len());

    for tx in rows {
        if seen.insert(tx.identity_key()) {
            unique.push(tx);
        } else {
            audit.record(
                EventKind::DuplicateRemoved,
                format!(
                    "Duplicate removed: {{'Date': '{}', 'ID': '{}', 'Tag': '{}', 'Amount': '{}'}}",
                    tx.date, tx.id, tx.tag, tx.amount
                ),
            );
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::txn;

    #[test]
    fn test_second_occurrence_dropped_despite_different_name() {
        let mut audit = AuditLog::new();
        let rows = vec![
            txn("2025-01-15", "1", "Grocery", "Store A", "10.00", "expense", "Food"),
            txn("2025-01-15", "1", "Grocery", "Store B", "10.00", "expense", "Food"),
        ];
        let unique = deduplicate(rows, &mut audit);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].name, "Store A");
        assert_eq!(audit.count(EventKind::DuplicateRemoved), 1);
    }

    #[test]
    fn test_order_preserved() {
        let mut audit = AuditLog::new();
        let rows = vec![
            txn("2025-01-03", "3", "C", "", "1.00", "expense", ""),
            txn("2025-01-01", "1", "A", "", "1.00", "expense", ""),
            txn("2025-01-03", "3", "C", "", "1.00", "expense", ""),
            txn("2025-01-02", "2", "B", "", "1.00", "expense", ""),
        ];
        let ids: Vec<String> = deduplicate(rows, &mut audit).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_amount_text_is_part_of_key() {
        let mut audit = AuditLog::new();
        let rows = vec![
            txn("2025-01-15", "1", "Grocery", "", "10.00", "expense", ""),
            txn("2025-01-15", "1", "Grocery", "", "10.0", "expense", ""),
        ];
        assert_eq!(deduplicate(rows, &mut audit).len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let mut audit = AuditLog::new();
        let rows = vec![
            txn("2025-01-15", "1", "A", "x", "10.00", "expense", ""),
            txn("2025-01-15", "1", "A", "y", "10.00", "expense", ""),
            txn("2025-01-16", "2", "B", "z", "5.00", "income", ""),
            txn("2025-01-16", "2", "B", "z", "5.00", "income", ""),
        ];
        let once = deduplicate(rows, &mut audit);
        let mut second_audit = AuditLog::new();
        let twice = deduplicate(once.clone(), &mut second_audit);
        assert_eq!(once, twice);
        assert!(second_audit.events().is_empty());
    }
}
