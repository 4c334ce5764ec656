//! Error types for event feed operations.
//!
//! [`EventSourceError`] is what an [`EventSource`](crate::EventSource) returns
//! when a page cannot be fetched. Callers decide what to do with it by its
//! [`SourceErrorKind`]: an authentication challenge goes back to the caller,
//! everything else becomes a displayable notice.

use std::fmt;

use thiserror::Error;

/// Coarse classification of an [`EventSourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorKind {
    /// The credential was rejected; the user has to sign in again.
    AuthChallengeRequired,
    /// A temporary condition (network, throttling, overload).
    Transient,
    /// Any other failure.
    Other,
}

impl SourceErrorKind {
    /// Returns a human-readable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthChallengeRequired => "auth_challenge_required",
            Self::Transient => "transient",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The detailed cause of an [`EventSourceError`].
///
/// Each code maps onto exactly one [`SourceErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// The credential is missing, expired or was rejected (401).
    Unauthorized,
    /// The credential is valid but lacks access (403).
    Forbidden,
    /// Connection failed, DNS resolution failed, or the body could not be read.
    Network,
    /// The request timed out (client side or 408).
    Timeout,
    /// Too many requests (429).
    Throttled,
    /// The service is temporarily unavailable (502, 503, 504).
    Unavailable,
    /// Any other server-side failure (5xx).
    Server,
    /// The response could not be parsed, or the feed misbehaved.
    InvalidResponse,
    /// The request was rejected as invalid (400, 404, ...).
    BadRequest,
    /// The source is not configured correctly.
    Configuration,
    /// Unexpected internal state.
    Internal,
}

impl SourceErrorCode {
    /// Returns the coarse kind for this code.
    pub fn kind(&self) -> SourceErrorKind {
        match self {
            Self::Unauthorized => SourceErrorKind::AuthChallengeRequired,
            Self::Network | Self::Timeout | Self::Throttled | Self::Unavailable => {
                SourceErrorKind::Transient
            }
            Self::Forbidden
            | Self::Server
            | Self::InvalidResponse
            | Self::BadRequest
            | Self::Configuration
            | Self::Internal => SourceErrorKind::Other,
        }
    }

    /// Returns true if this error is transient and the request may be retried.
    pub fn is_retryable(&self) -> bool {
        self.kind() == SourceErrorKind::Transient
    }

    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Network => "network_error",
            Self::Timeout => "timeout",
            Self::Throttled => "throttled",
            Self::Unavailable => "unavailable",
            Self::Server => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::BadRequest => "bad_request",
            Self::Configuration => "configuration_error",
            Self::Internal => "internal_error",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while fetching from an event feed.
#[derive(Debug, Error)]
pub struct EventSourceError {
    code: SourceErrorCode,
    message: String,
    /// The source that produced the error (e.g. "graph").
    source_name: Option<String>,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl EventSourceError {
    /// Creates a new error with the given code and message.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_name: None,
            cause: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Forbidden, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Timeout, message)
    }

    pub fn throttled(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Throttled, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Unavailable, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Server, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidResponse, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::BadRequest, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Configuration, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Internal, message)
    }

    /// Sets the name of the source that produced this error.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    pub fn kind(&self) -> SourceErrorKind {
        self.code.kind()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Returns true if the user must sign in again.
    pub fn is_auth_challenge(&self) -> bool {
        self.kind() == SourceErrorKind::AuthChallengeRequired
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for EventSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.source_name {
            write!(f, "[{}] ", name)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for event feed operations.
pub type EventSourceResult<T> = Result<T, EventSourceError>;

/// Which boundary of an event a [`MalformedEventError`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeField {
    Start,
    End,
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// A raw event record could not be turned into a display event.
///
/// `index` is the record's position in the drained sequence when known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEventError {
    #[error("event{}: {field} time is missing", position(.index))]
    MissingTime {
        index: Option<usize>,
        field: TimeField,
    },

    #[error("event{}: {field} time {value:?} is not a valid timestamp", position(.index))]
    UnparsableTime {
        index: Option<usize>,
        field: TimeField,
        value: String,
    },
}

impl MalformedEventError {
    /// Records the position of the offending record.
    pub fn at_index(self, at: usize) -> Self {
        match self {
            Self::MissingTime { field, .. } => Self::MissingTime {
                index: Some(at),
                field,
            },
            Self::UnparsableTime { field, value, .. } => Self::UnparsableTime {
                index: Some(at),
                field,
                value,
            },
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Self::MissingTime { index, .. } | Self::UnparsableTime { index, .. } => *index,
        }
    }

    pub fn field(&self) -> TimeField {
        match self {
            Self::MissingTime { field, .. } | Self::UnparsableTime { field, .. } => *field,
        }
    }
}

fn position(index: &Option<usize>) -> String {
    index.map(|i| format!(" #{}", i)).unwrap_or_default()
}
