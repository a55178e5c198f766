use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Normalized failure from the comment API. The `Display` output is the
/// stable, user-facing diagnostic text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{status} - {reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response (connect, timeout, TLS...).
    #[error("{0}")]
    Transport(String),

    /// The response body could not be understood.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The entity has not been persisted yet, so it cannot be addressed.
    #[error("{0} has no id")]
    MissingId(&'static str),

    #[error("Response missing {0} header")]
    MissingHeader(&'static str),
}

impl ApiError {
    pub fn server_error() -> Self {
        Self::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
        }
    }
}

/// Folds any transport-level failure into an [`ApiError`].
pub fn normalize_error(err: reqwest::Error) -> ApiError {
    if let Some(status) = err.status() {
        return ApiError::Status {
            status: status.as_u16(),
            reason: status
                .canonical_reason()
                .unwrap_or("Server error")
                .to_string(),
        };
    }

    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
