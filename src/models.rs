/// Column order shared by every input batch and the combined ledger.
pub const CSV_HEADER: [&str; 8] = ["Date", "ID", "Tag", "Name", "Amount", "Type", "Category", "Source"];

pub const SUMMARY_HEADER: [&str; 6] = [
    "Group",
    "Category",
    "Expense",
    "Income",
    "Net",
    "Net_With_Starting_Balance",
];

/// One row of a debit or credit export after loading.
///
/// All fields stay as text: exports are dirty, and only the aggregator needs
/// `amount` and `date` as typed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: String,
    pub id: String,
    pub tag: String,
    pub name: String,
    /// Unsigned magnitude; direction comes from `kind`.
    pub amount: String,
    /// The `Type` column: `expense` or `income`, any case.
    pub kind: String,
    pub category: String,
    pub source: String,
}

impl Transaction {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            date: self.date.clone(),
            id: self.id.clone(),
            tag: self.tag.clone(),
            kind: self.kind.clone(),
            amount: self.amount.clone(),
        }
    }

    /// Anything that is not `expense` counts as income.
    pub fn is_expense(&self) -> bool {
        self.kind.to_lowercase() == "expense"
    }

    pub fn to_record(&self) -> [&str; 8] {
        [
            self.date.as_str(),
            self.id.as_str(),
            self.tag.as_str(),
            self.name.as_str(),
            self.amount.as_str(),
            self.kind.as_str(),
            self.category.as_str(),
            self.source.as_str(),
        ]
    }
}

/// Fields that decide whether two rows are the same transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub date: String,
    pub id: String,
    pub tag: String,
    pub kind: String,
    pub amount: String,
}

/// Input batch a row was read from. Load order follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Batch {
    Debit,
    Credit,
}

impl Batch {
    pub const ALL: [Batch; 2] = [Batch::Debit, Batch::Credit];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }

    pub fn folder(&self) -> &'static str {
        match self {
            Self::Debit => "Debit",
            Self::Credit => "Credit",
        }
    }
}

#[cfg(test)]
pub(crate) fn txn(date: &str, id: &str, tag: &str, name: &str, amount: &str, kind: &str, category: &str) -> Transaction {
    Transaction {
        date: date.to_string(),
        id: id.to_string(),
        tag: tag.to_string(),
        name: name.to_string(),
        amount: amount.to_string(),
        kind: kind.to_string(),
        category: category.to_string(),
        source: "DEBIT".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_ignores_name_category_source() {
        let a = txn("2025-01-15", "1", "Grocery", "Store A", "10.00", "expense", "Food");
        let mut b = txn("2025-01-15", "1", "Grocery", "Store B", "10.00", "expense", "Misc");
        b.source = "CREDIT".to_string();
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_identity_key_type_is_case_sensitive() {
        let a = txn("2025-01-15", "1", "Grocery", "Store", "10.00", "expense", "Food");
        let b = txn("2025-01-15", "1", "Grocery", "Store", "10.00", "Expense", "Food");
        assert_ne!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_is_expense_permissive() {
        assert!(txn("", "", "", "", "1", "EXPENSE", "").is_expense());
        assert!(!txn("", "", "", "", "1", "income", "").is_expense());
        assert!(!txn("", "", "", "", "1", "expnse", "").is_expense());
    }
}
