use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Config file already exists: {0}")]
    ConfigExists(PathBuf),

    #[error("Report not found: {0}")]
    ReportNotFound(PathBuf),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {0}")]
    NotAGitRepository(PathBuf),

    #[error("External process failed: {0}")]
    ExternalProcessFailed(String),

    #[error("Command failed: {command}, exit code: {code:?}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("History file corrupted: {0}")]
    HistoryCorrupted(String),

    #[error("{failed} of {total} steps failed")]
    RunFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
