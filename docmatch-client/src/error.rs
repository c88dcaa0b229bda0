use reqwest::StatusCode;
use thiserror::Error;

/// Failure taxonomy for one attempt against the scanner API.
///
/// Every variant is terminal for the attempt that produced it; nothing here
/// is retried automatically. Malformed JSON on a success response surfaces
/// through [`ApiError::Network`], the same shape a transport failure takes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A local guard failed before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The server answered 401. This is an exhaustive case: once a response
    /// is unauthorized no other branch inspects it.
    #[error("{message}")]
    Unauthorized { message: String },

    /// A non-2xx auth response that carried a server `{message}` body.
    #[error("{message}")]
    Rejected { message: String },

    /// Any other non-2xx status.
    #[error("HTTP error {}", .status.as_u16())]
    Http { status: StatusCode },

    /// Transport-level failure, including JSON decode failures.
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
