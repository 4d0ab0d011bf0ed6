//! CLI setup module
//!
//! Handles initialization of the StudyFlow core for CLI usage.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use studyflow_core::{AppCore, ClientConfig, paths};

/// Build the embedded StudyFlow core
pub fn prepare_core(db_path: Option<String>, config: ClientConfig) -> Result<Arc<AppCore>> {
    let db_path = match db_path {
        Some(path) => PathBuf::from(path),
        None => paths::ensure_database_path()?,
    };
    let core = AppCore::new(&db_path, config)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    Ok(Arc::new(core))
}
