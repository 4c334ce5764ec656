//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// The event feed could not be set up or read.
    Source(String),
    /// IO error.
    Io(std::io::Error),
    /// The user has to sign in again.
    AuthRequired(String),
    /// Output could not be produced.
    Render(String),
}

impl ClientError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::AuthRequired(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Source(msg) => write!(f, "event source error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::AuthRequired(msg) => write!(f, "sign-in required: {}", msg),
            Self::Render(msg) => write!(f, "output error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<weekview_providers::EventSourceError> for ClientError {
    fn from(err: weekview_providers::EventSourceError) -> Self {
        if err.is_auth_challenge() {
            Self::AuthRequired(err.to_string())
        } else {
            Self::Source(err.to_string())
        }
    }
}

impl From<weekview_providers::ReauthenticationRequired> for ClientError {
    fn from(err: weekview_providers::ReauthenticationRequired) -> Self {
        Self::AuthRequired(err.cause().to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}
