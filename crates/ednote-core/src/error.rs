//! Error types for ednote.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No data provided")]
    EmptyInput,

    #[error("Invalid abbreviation source: {0}")]
    InvalidAbbreviationSource(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
