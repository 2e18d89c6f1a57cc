use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The input document does not have the expected top-level shape.
    #[error("Invalid JSON structure: {0}")]
    Structure(String),

    /// A transaction date is not a valid `DD.MM.YYYY` calendar date.
    #[error("Failed to parse date: {0}")]
    DateFormat(String),

    #[error("Unknown {kind} code: {code}")]
    UnknownCode { kind: &'static str, code: String },

    #[error("Invalid tax number '{0}': expected 8 digits")]
    InvalidTaxNumber(String),

    #[error("File does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Utf8(#[from] FromUtf8Error),
}
