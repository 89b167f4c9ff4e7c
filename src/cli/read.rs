use std::io::Write;

use crate::error::{Result, TxMergeError};
use crate::pipeline::RunConfig;
use crate::settings::{load_settings, resolve_data_dir};

pub fn run(data_dir: Option<&str>) -> Result<()> {
    let config = RunConfig::for_data_dir(&resolve_data_dir(data_dir, &load_settings()));
    let path = config.ledger_path();
    if !path.exists() {
        return Err(TxMergeError::Other(format!(
            "No combined ledger at {}\nRun `txmerge run` first.",
            path.display()
        )));
    }
    let content = std::fs::read(&path)?;
    std::io::stdout().write_all(&content)?;
    Ok(())
}
