use std::path::PathBuf;

use crate::error::Result;
use crate::models::Batch;
use crate::pipeline::IGNORE_FILENAME;
use crate::settings::{load_settings, save_settings, shellexpand_path};

const IGNORES_TEMPLATE: &str = "\
# One pattern per line. Transactions whose Tag or Name contains a pattern
# (case-insensitive) are left out of the combined ledger.
# Lines starting with # are comments.
";

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    for batch in Batch::ALL {
        std::fs::create_dir_all(resolved.join(batch.folder()))?;
    }
    let config_dir = resolved.join("Config");
    std::fs::create_dir_all(&config_dir)?;
    let ignores = config_dir.join(IGNORE_FILENAME);
    if !ignores.exists() {
        std::fs::write(&ignores, IGNORES_TEMPLATE)?;
    }

    println!("Initialized txmerge at {}", resolved.display());
    println!("Drop debit exports into Debit/ and credit exports into Credit/, then run `txmerge run`.");
    Ok(())
}
