use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{Batch, Transaction, CSV_HEADER};

/// `.csv` files directly inside `folder`, sorted by file name.
///
/// A missing folder is an empty batch, not an error.
pub fn csv_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map_or(false, |e| e.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse one export file. Header rows and rows without exactly eight
/// fields are skipped without comment.
pub fn parse_file(file_path: &Path, batch: Batch) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let mut rows = Vec::new();

    for result in rdr.records() {
        let Ok(record) = result else { continue };
        if record.len() != CSV_HEADER.len() || record.iter().eq(CSV_HEADER.iter().copied()) {
            continue;
        }
        let field = |i: usize| record[i].trim().to_string();
        rows.push(Transaction {
            date: field(0),
            id: field(1),
            tag: field(2),
            name: field(3),
            amount: record[4].trim().trim_start_matches('-').to_string(),
            kind: field(5),
            category: field(6),
            source: batch.label().to_string(),
        });
    }
    Ok(rows)
}

pub fn load_batch(folder: &Path, batch: Batch) -> Result<Vec<Transaction>> {
    let mut rows = Vec::new();
    for file_path in csv_files(folder)? {
        rows.extend(parse_file(&file_path, batch)?);
    }
    Ok(rows)
}

/// Every batch under `data_dir`, concatenated in `Batch::ALL` order.
pub fn load_all(data_dir: &Path) -> Result<Vec<Transaction>> {
    let mut rows = Vec::new();
    for batch in Batch::ALL {
        rows.extend(load_batch(&data_dir.join(batch.folder()), batch)?);
    }
    Ok(rows)
}
