use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ThemeError {
    #[error("invalid capabilities url: {0}")]
    InvalidUrl(String),

    #[error("capabilities request failed: {0}")]
    CapabilitiesHttp(String),

    #[error("capabilities returned status {status}: {message}")]
    CapabilitiesStatus { status: u16, message: String },

    #[error("failed to parse capabilities document: {0}")]
    CapabilitiesParse(String),

    #[error("failed to read store file at {0}")]
    StoreRead(PathBuf),

    #[error("failed to parse JSON store: {0}")]
    StoreParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
