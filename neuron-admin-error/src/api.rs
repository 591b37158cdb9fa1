use thiserror::Error;

/// Errors raised while talking to the gateway configuration API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    /// The gateway answered with a non-zero `error` code in the body.
    ///
    /// `index` is only present for batch endpoints (tag upload) and points at
    /// the 0-based entry of the batch that failed.
    #[error("Backend error {code}{}", .index.map(|i| format!(" at index {i}")).unwrap_or_default())]
    Backend { code: i64, index: Option<usize> },
    #[error("HTTP status {status}: `{body}`")]
    Status { status: u16, body: String },
    #[error("Transport error: `{0}`")]
    Transport(String),
    #[error("Decode error: `{0}`")]
    Decode(String),
}

impl ApiError {
    /// Structured `{index, error}` payload of a failed batch, if any.
    #[inline]
    pub fn partial_failure(&self) -> Option<(usize, i64)> {
        match self {
            ApiError::Backend {
                code,
                index: Some(index),
            } => Some((*index, *code)),
            _ => None,
        }
    }

    /// Numeric gateway error code, if the failure carried one.
    #[inline]
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Backend { code, .. } => Some(*code),
            _ => None,
        }
    }
}
