// Error types for a colorization request.
//
// Every failure the user can hit ends up as the same alert, but we keep
// the kinds apart internally so logs (and future UI) can tell a dead
// server from a bad response.

/// Message shown to the user for any failed colorization request.
pub const BACKEND_UNREACHABLE: &str = "Error: Is the Backend Running?";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorizeError {
    /// DNS, connection, TLS or timeout problems: no HTTP status was received.
    #[error("network error: {0}")]
    Network(String),
    /// The service answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Server { status: u16 },
    /// A 2xx response whose body could not be read or was empty.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ColorizeError {
    /// The text surfaced to the user. Identical for every variant.
    pub fn user_message(&self) -> &'static str {
        BACKEND_UNREACHABLE
    }
}

impl From<reqwest::Error> for ColorizeError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ColorizeError::Server {
                status: status.as_u16(),
            },
            None if err.is_decode() || err.is_body() => ColorizeError::Decode(err.to_string()),
            None => ColorizeError::Network(err.to_string()),
        }
    }
}
