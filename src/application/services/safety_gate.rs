//! Applies the configured safety policy to oracle outcomes.

use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::error::AppError;
use crate::infrastructure::safety::{OracleMode, SafetyOracle, Verdict};
use crate::utils::counters;

/// Single screening point used by link creation, link update, and resolution.
///
/// | outcome | fail-closed | fail-open |
/// |---|---|---|
/// | safe | pass | pass |
/// | unsafe | `UnsafeUrl` | `UnsafeUrl` |
/// | lookup error | `Dependency` | pass, `warn!` |
#[derive(Clone)]
pub struct SafetyGate {
    oracle: Arc<dyn SafetyOracle>,
}

impl SafetyGate {
    pub fn new(oracle: Arc<dyn SafetyOracle>) -> Self {
        Self { oracle }
    }

    pub fn mode(&self) -> OracleMode {
        self.oracle.mode()
    }

    /// Screens `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnsafeUrl`] on an unsafe verdict, and
    /// [`AppError::Dependency`] when the lookup fails under fail-closed.
    pub async fn screen(&self, url: &str) -> Result<(), AppError> {
        let mode = self.oracle.mode();
        if mode == OracleMode::Disabled {
            counters::record_safety_check("skipped");
            return Ok(());
        }

        match self.oracle.check(url).await {
            Ok(Verdict::Safe) => {
                counters::record_safety_check("safe");
                Ok(())
            }
            Ok(Verdict::Unsafe { threats }) => {
                counters::record_safety_check("unsafe");
                warn!(url, ?threats, "Blocked unsafe URL");
                Err(AppError::unsafe_url(
                    "URL is flagged as unsafe",
                    json!({ "threats": threats }),
                ))
            }
            Err(e) if mode == OracleMode::FailOpen => {
                counters::record_safety_check("error_passed");
                warn!(url, error = %e, "Safety lookup failed; allowing URL");
                Ok(())
            }
            Err(e) => {
                counters::record_safety_check("error_blocked");
                warn!(url, error = %e, "Safety lookup failed; blocking URL");
                Err(AppError::dependency(
                    "URL safety check is unavailable",
                    json!({ "reason": "lookup failed" }),
                ))
            }
        }
    }
}
