//! Credentials for calling the event feed.
//!
//! How a credential is obtained or refreshed is outside this crate. An
//! [`Authenticator`] only has to hand out a bearer token that is live right
//! now, or say that the user has to sign in again.

use std::fmt;

use crate::error::{EventSourceError, EventSourceResult};
use crate::source::BoxFuture;

/// A bearer token. The value is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Supplies a live credential for the event feed.
pub trait Authenticator: Send + Sync {
    /// Returns a token valid for the next request.
    ///
    /// # Errors
    ///
    /// Returns an [`EventSourceError`] with
    /// [`SourceErrorCode::Unauthorized`](crate::SourceErrorCode::Unauthorized)
    /// when no credential is available.
    fn access_token(&self) -> BoxFuture<'_, EventSourceResult<AccessToken>>;
}

/// A fixed token, e.g. from configuration.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: Option<AccessToken>,
}

impl StaticToken {
    /// Wraps a token. A blank token behaves like no token at all.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then(|| AccessToken::new(token.trim())),
        }
    }

    /// An authenticator that always asks for a new sign-in.
    pub fn missing() -> Self {
        Self { token: None }
    }
}

impl Authenticator for StaticToken {
    fn access_token(&self) -> BoxFuture<'_, EventSourceResult<AccessToken>> {
        let result = self
            .token
            .clone()
            .ok_or_else(|| EventSourceError::unauthorized("no access token configured"));
        Box::pin(async move { result })
    }
}
