use thiserror::Error;

/// Top-level error type for the `wanview-api` crate.
///
/// Two recoverable families matter to consumers: transport failures
/// (connection refused, timeout, non-2xx status) and validation failures
/// (a 2xx body that doesn't decode into the expected shape). `wanview-core`
/// logs both and keeps the last published state untouched — the next
/// scheduled poll is the retry.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or joining error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The monitor answered with a non-success status code.
    #[error("Monitor returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    // ── Validation ──────────────────────────────────────────────────
    /// A 2xx body failed to decode, with the raw body for debugging.
    /// Covers missing required sections (e.g. an absent `wan2`).
    #[error("Invalid payload from {endpoint}: {message}")]
    Decode {
        endpoint: String,
        message: String,
        body: String,
    },
}

impl Error {
    /// Whether this error is a payload-validation failure rather than a
    /// transport problem. Both are recovered identically, but they are
    /// logged under distinct labels.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
