use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read seed file '{path}': {source}")]
    SeedRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Seed file '{path}' is not a JSON array of documents: {source}")]
    SeedParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
