use thiserror::Error;

/// Errors from the external recipe API seam.
///
/// All of these are caught at the call site and downgraded to partial or
/// empty results; they never propagate past a single recipe's resolution.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(u16),

    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No mock response for {0}")]
    NoMockResponse(String),
}
