use anyhow::Result;
use std::path::PathBuf;

const STUDYFLOW_DIR: &str = ".studyflow";
const DB_FILE: &str = "studyflow.db";
const LOGS_DIR: &str = "logs";

/// Environment variable to override the StudyFlow directory.
const STUDYFLOW_DIR_ENV: &str = "STUDYFLOW_DIR";

/// Resolve the StudyFlow data directory.
/// Priority: STUDYFLOW_DIR env var > ~/.studyflow/
pub fn resolve_studyflow_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(STUDYFLOW_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(STUDYFLOW_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Ensure the StudyFlow directory exists and return its path.
pub fn ensure_studyflow_dir() -> Result<PathBuf> {
    let dir = resolve_studyflow_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Ensure the data directory exists and return the database path: ~/.studyflow/studyflow.db
pub fn ensure_database_path() -> Result<PathBuf> {
    Ok(ensure_studyflow_dir()?.join(DB_FILE))
}

/// Get the logs directory: ~/.studyflow/logs/
pub fn logs_dir() -> Result<PathBuf> {
    let dir = resolve_studyflow_dir()?.join(LOGS_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
