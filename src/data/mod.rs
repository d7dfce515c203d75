pub mod migrations;
pub mod repository;

use std::path::PathBuf;

use crate::error::AppError;

/// Default location for the on-disk archive, under the per-user data dir.
pub fn default_db_path() -> Result<PathBuf, AppError> {
    let base = dirs::data_dir()
        .ok_or_else(|| AppError::General("could not resolve user data directory".to_string()))?;
    Ok(base.join("magpie").join("magpie.db"))
}
