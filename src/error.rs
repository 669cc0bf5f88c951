use std::path::PathBuf;

/// Failures that abort a load or an export. Malformed data rows are not
/// errors; they are collected in [`crate::loader::LoadReport`].
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
