//! Error types for sky rendering.

use std::path::PathBuf;

use parquet::errors::ParquetError;
use thiserror::Error;

/// Errors that can occur while reading the catalog or producing an image.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Star catalog '{path}' not found")]
    CatalogNotFound { path: PathBuf },

    #[error("Failed to open star catalog '{path}': {source}")]
    CatalogOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read star catalog '{path}': {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: ParquetError,
    },

    #[error("Star catalog '{path}' has {found} columns, expected at least 4 (RA, Dec, band 1, band 2)")]
    TooFewColumns { path: PathBuf, found: usize },

    #[error("Column {index} ('{name}') of star catalog '{path}' is not a floating-point column")]
    UnsupportedColumnType {
        path: PathBuf,
        index: usize,
        name: String,
    },

    #[error("Failed to load render config: {0}")]
    Config(#[from] common::SerdeFormatError),

    #[error("Invalid render parameters: {0}")]
    InvalidParams(String),

    #[error("Image generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
