use thiserror::Error;

/// Error type for `wanview-core` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Monitor API call failed (transport or validation).
    #[error(transparent)]
    Api(#[from] wanview_api::Error),

    /// Monitor base URL could not be parsed.
    #[error("invalid monitor URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
