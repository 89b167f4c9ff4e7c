use std::path::Path;

use crate::audit::{AuditLog, EventKind};
use crate::models::Transaction;

/// Lowercase substring patterns matched against `tag` and `name`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IgnorePatterns {
    patterns: Vec<String>,
}

impl IgnorePatterns {
    /// One pattern per line; blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        let patterns = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { patterns }
    }

    /// A missing or unreadable file yields no patterns, with a warning.
    pub fn load(path: &Path, audit: &mut AuditLog) -> Self {
        if !path.is_file() {
            audit.record(
                EventKind::IgnoreFileMissing,
                format!("No ignores file at {}, nothing will be ignored", path.display()),
            );
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                audit.record(
                    EventKind::IgnoreFileUnreadable,
                    format!("Failed reading ignores file: {e}"),
                );
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let tag = tx.tag.to_lowercase();
        let name = tx.name.to_lowercase();
        self.patterns
            .iter()
            .any(|p| tag.contains(p.as_str()) || name.contains(p.as_str()))
    }

    /// Drop matching rows. Only the total is reported, never each match.
    pub fn apply(&self, rows: Vec<Transaction>, audit: &mut AuditLog) -> Vec<Transaction> {
        let before = rows.len();
        let kept: Vec<Transaction> = rows.into_iter().filter(|tx| !self.matches(tx)).collect();
        let skipped = before - kept.len();
        if skipped > 0 {
            audit.record(
                EventKind::Ignored,
                format!("Ignored {skipped} transactions due to ignores.txt patterns"),
            );
        }
        kept
    }
}
