use thiserror::Error;

/// Failures crossing the AI façade boundary.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("missing configuration: set {0}")]
    MissingConfig(&'static str),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The response arrived after a newer request of the same kind was
    /// issued; the caller must discard it.
    #[error("superseded by a newer request")]
    Stale,
}

pub type AiResult<T> = Result<T, AiError>;
