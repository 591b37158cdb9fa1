pub mod api;
pub mod import;

use anyhow::Error as AnyhowError;
use api::ApiError;
use config::ConfigError;
use import::ImportError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;

pub type NAResult<T, E = NAError> = anyhow::Result<T, E>;
pub type ApiResult<T, E = ApiError> = Result<T, E>;
pub type ImportResult<T, E = ImportError> = Result<T, E>;

#[derive(Error, Debug)]
pub enum NAError {
    #[error("{0}")]
    IoError(#[from] IoError),
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    Anyhow(#[from] AnyhowError),
    #[error("{0}")]
    Json(#[from] SerdeJsonError),
    #[error("{0}")]
    ConfigError(#[from] ConfigError),
    #[error("{0}")]
    ApiError(#[from] ApiError),
    #[error("{0}")]
    ImportError(#[from] ImportError),
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<String> for NAError {
    #[inline]
    fn from(e: String) -> Self {
        NAError::Msg(e)
    }
}

impl From<&str> for NAError {
    #[inline]
    fn from(e: &str) -> Self {
        NAError::Msg(e.to_string())
    }
}

impl From<&NAError> for NAError {
    #[inline]
    fn from(e: &NAError) -> Self {
        NAError::Msg(e.to_string())
    }
}
