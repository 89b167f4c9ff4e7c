use std::path::{Path, PathBuf};

use crate::audit::{AuditLog, EventKind};
use crate::error::Result;
use crate::models::{Transaction, CSV_HEADER, SUMMARY_HEADER};
use crate::reports::SummaryReport;

/// Move every file in `result_dir` into `archive_dir` as `<stamp>_<name>`.
pub fn archive_existing_results(
    result_dir: &Path,
    archive_dir: &Path,
    audit: &mut AuditLog,
) -> Result<Vec<PathBuf>> {
    if !result_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(result_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    if files.is_empty() {
        return Ok(Vec::new());
    }
    files.sort();
    std::fs::create_dir_all(archive_dir)?;

    let mut archived = Vec::new();
    for src in files {
        let Some(name) = src.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();
        let dst = archive_destination(archive_dir, &stamp, &name);
        std::fs::rename(&src, &dst)?;
        audit.record(
            EventKind::Archived,
            format!("Archived old result file: {name} -> {}", dst.display()),
        );
        archived.push(dst);
    }
    Ok(archived)
}

/// `<stamp>_<name>`, or `<stamp>_<n>_<name>` when an earlier run in the same
/// second already took that name.
fn archive_destination(archive_dir: &Path, stamp: &str, name: &str) -> PathBuf {
    let first = archive_dir.join(format!("{stamp}_{name}"));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| archive_dir.join(format!("{stamp}_{n}_{name}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// Write the combined ledger, rows ordered by the `Date` text.
pub fn write_ledger(path: &Path, rows: &[Transaction], audit: &mut AuditLog) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut sorted: Vec<&Transaction> = rows.iter().collect();
    // Stable: rows sharing a date keep their dedup order.
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CSV_HEADER)?;
    for tx in sorted {
        wtr.write_record(tx.to_record())?;
    }
    wtr.flush()?;
    audit.record(
        EventKind::Generated,
        format!("Generated combined CSV: {}", path.display()),
    );
    Ok(())
}

pub fn write_summary(path: &Path, report: &SummaryReport, audit: &mut AuditLog) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(SUMMARY_HEADER)?;
    for row in report.rows() {
        wtr.write_record(row.to_record())?;
    }
    wtr.flush()?;
    audit.record(
        EventKind::Generated,
        format!("Generated summary CSV: {}", path.display()),
    );
    Ok(())
}
