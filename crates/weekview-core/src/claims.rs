//! User preferences carried alongside the signed-in identity.
//!
//! The sign-in side records a handful of profile values as key/value claims.
//! The week view only reads them, through the [`UserClaims`] capability.

use std::collections::HashMap;

use crate::format::{DEFAULT_TIME_FORMAT, TimeFormat};

/// Claim keys understood by [`UserClaims`].
pub mod claim_types {
    pub const DISPLAY_NAME: &str = "display_name";
    pub const EMAIL: &str = "email";
    pub const TIMEZONE: &str = "timezone";
    pub const TIME_FORMAT: &str = "time_format";
}

/// Zone recorded when the profile carries none.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Read-only access to the signed-in user's claims.
pub trait UserClaims: Send + Sync {
    /// Looks up a raw claim value.
    fn claim(&self, key: &str) -> Option<&str>;

    fn display_name(&self) -> Option<&str> {
        self.claim(claim_types::DISPLAY_NAME)
    }

    fn email(&self) -> Option<&str> {
        self.claim(claim_types::EMAIL)
    }

    /// The preferred timezone identifier (IANA or Windows name).
    fn timezone(&self) -> Option<&str> {
        self.claim(claim_types::TIMEZONE)
    }

    /// The preferred time-of-day pattern, e.g. `HH:mm`.
    fn time_format(&self) -> Option<&str> {
        self.claim(claim_types::TIME_FORMAT)
    }

    /// The preferred time format, parsed, falling back to the default.
    fn parsed_time_format(&self) -> TimeFormat {
        self.time_format()
            .map(TimeFormat::from_pattern)
            .unwrap_or_default()
    }
}

/// A simple in-memory claim set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSet {
    claims: HashMap<String, String>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the claims recorded at sign-in from a mailbox profile.
    ///
    /// Missing timezone and time format are recorded as `UTC` and `HH:mm`.
    pub fn from_profile(
        display_name: Option<&str>,
        email: Option<&str>,
        timezone: Option<&str>,
        time_format: Option<&str>,
    ) -> Self {
        Self::new()
            .with_claim(claim_types::DISPLAY_NAME, display_name.unwrap_or_default())
            .with_claim(claim_types::EMAIL, email.unwrap_or_default())
            .with_claim(claim_types::TIMEZONE, timezone.unwrap_or(DEFAULT_TIMEZONE))
            .with_claim(
                claim_types::TIME_FORMAT,
                time_format.unwrap_or(DEFAULT_TIME_FORMAT),
            )
    }

    /// Builder method to add or replace a claim.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl UserClaims for ClaimSet {
    fn claim(&self, key: &str) -> Option<&str> {
        self.claims.get(key).map(String::as_str)
    }
}
