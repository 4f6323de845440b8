//! Error types for the loader.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Source format error in {}: {message}", path.display())]
    SourceFormat { path: PathBuf, message: String },
    #[error("Query execution failed: {0}")]
    Query(String),
    #[error("Batch {batch_index} failed: {cause}")]
    BatchWrite { batch_index: usize, cause: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LoaderError>;
