//! No-op oracle used when URL screening is disabled.

use super::service::{OracleMode, SafetyError, SafetyOracle, Verdict};
use async_trait::async_trait;
use tracing::debug;

/// An oracle that reports every URL as safe.
pub struct NullOracle;

impl NullOracle {
    pub fn new() -> Self {
        debug!("Using NullOracle (URL screening disabled)");
        Self
    }
}

impl Default for NullOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SafetyOracle for NullOracle {
    fn mode(&self) -> OracleMode {
        OracleMode::Disabled
    }

    async fn check(&self, _url: &str) -> Result<Verdict, SafetyError> {
        Ok(Verdict::Safe)
    }
}
