use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use log::{info, warn};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    AutomaticPaymentSkipped,
    IdExpanded,
    IdExpansionFailed,
    IdReplaced,
    DuplicateRemoved,
    Ignored,
    IgnoreFileMissing,
    IgnoreFileUnreadable,
    InvalidAmount,
    InvalidDate,
    Archived,
    Generated,
}

impl EventKind {
    /// Conditions a user should look at; the rest are routine bookkeeping.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::IdExpansionFailed
                | Self::IgnoreFileMissing
                | Self::IgnoreFileUnreadable
                | Self::InvalidAmount
                | Self::InvalidDate
        )
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub timestamp: DateTime<Local>,
    pub kind: EventKind,
    pub message: String,
}

impl Event {
    pub fn line(&self) -> String {
        format!("{} - {}", self.timestamp.format("%Y-%m-%dT%H:%M:%S%.6f"), self.message)
    }
}

/// Collects the diagnostic events of a single run.
#[derive(Debug, Default)]
pub struct AuditLog {
    events: Vec<Event>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: EventKind, message: impl Into<String>) {
        let message = message.into();
        if kind.is_warning() {
            warn!("{message}");
        } else {
            info!("{message}");
        }
        self.events.push(Event {
            timestamp: Local::now(),
            kind,
            message,
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Append every event to a text log, one `timestamp - message` line each.
    pub fn append_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        for event in &self.events {
            writeln!(file, "{}", event.line())?;
        }
        Ok(())
    }
}
