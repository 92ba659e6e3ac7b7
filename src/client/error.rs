use thiserror::Error;

/// Why a catalog request did not produce data.
///
/// Views only distinguish "error" from "data"; the variants exist for logs.
/// Payloads are plain strings so one failure can be handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never got a response (refused, timed out, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
