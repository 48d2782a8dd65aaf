//! Safety oracle trait, verdicts, and error types.

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// What to do when a lookup cannot be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Block the operation (`strict`).
    #[default]
    FailClosed,
    /// Let the URL through and log a warning (`lenient`).
    FailOpen,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "fail-closed" => Ok(Self::FailClosed),
            "lenient" | "fail-open" => Ok(Self::FailOpen),
            other => Err(format!(
                "unknown safety policy '{other}' (expected 'strict' or 'lenient')"
            )),
        }
    }
}

/// Active mode reported by an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleMode {
    Disabled,
    FailClosed,
    FailOpen,
}

impl OracleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::FailClosed => "fail-closed",
            Self::FailOpen => "fail-open",
        }
    }
}

impl From<FailurePolicy> for OracleMode {
    fn from(policy: FailurePolicy) -> Self {
        match policy {
            FailurePolicy::FailClosed => Self::FailClosed,
            FailurePolicy::FailOpen => Self::FailOpen,
        }
    }
}

impl fmt::Display for OracleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a completed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    /// Flagged, with the reported threat types.
    Unsafe { threats: Vec<String> },
}

impl Verdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }
}

/// Errors that prevent a verdict.
#[derive(Debug, thiserror::Error)]
pub enum SafetyError {
    #[error("Safety lookup is not configured: {0}")]
    NotConfigured(String),

    #[error("Safety lookup timed out")]
    Timeout,

    #[error("Safety lookup request failed: {0}")]
    Request(String),

    #[error("Safety lookup returned an unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Failed to load threat list: {0}")]
    ThreatList(String),
}

impl From<reqwest::Error> for SafetyError {
    /// Drops the request URL first; it carries the API key.
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Reputation lookup for target URLs.
///
/// A lookup error is not a verdict; callers decide what it means through
/// [`crate::application::services::SafetyGate`].
///
/// # Implementations
///
/// - [`crate::infrastructure::safety::SafeBrowsingOracle`] - Google Safe Browsing v4 Lookup API
/// - [`crate::infrastructure::safety::NullOracle`] - Disabled; every URL is safe
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SafetyOracle: Send + Sync {
    /// Reports whether lookups run and how their failures are treated.
    fn mode(&self) -> OracleMode;

    /// Looks up `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError`] when no verdict could be obtained.
    async fn check(&self, url: &str) -> Result<Verdict, SafetyError>;
}
