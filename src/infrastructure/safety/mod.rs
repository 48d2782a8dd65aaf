//! URL safety screening.
//!
//! Provides a [`SafetyOracle`] trait with two implementations:
//! - [`SafeBrowsingOracle`] - Google Safe Browsing v4 Lookup API, optionally
//!   backed by a local [`ThreatList`]
//! - [`NullOracle`] - No-op implementation when screening is disabled

mod null_oracle;
mod safe_browsing;
mod service;
mod threat_list;

pub use null_oracle::NullOracle;
pub use safe_browsing::SafeBrowsingOracle;
pub use service::{FailurePolicy, OracleMode, SafetyError, SafetyOracle, Verdict};
pub use threat_list::ThreatList;

#[cfg(test)]
pub use service::MockSafetyOracle;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Startup settings for URL screening.
#[derive(Debug, Clone)]
pub struct SafetySettings {
    pub api_key: Option<String>,
    pub threat_list_path: Option<PathBuf>,
    pub required: bool,
    pub policy: FailurePolicy,
    pub timeout: Duration,
}

/// Builds the process-wide oracle.
///
/// Without an API key, or when initialization fails, screening is disabled
/// with a warning unless `required` is set.
///
/// # Errors
///
/// Returns [`SafetyError`] only when `required` is true and the oracle cannot
/// be created.
pub fn init_oracle(settings: &SafetySettings) -> Result<Arc<dyn SafetyOracle>, SafetyError> {
    match build(settings) {
        Ok(oracle) => Ok(oracle),
        Err(e) if settings.required => Err(e),
        Err(e) => {
            warn!(error = %e, "URL safety screening disabled");
            Ok(Arc::new(NullOracle::new()))
        }
    }
}

fn build(settings: &SafetySettings) -> Result<Arc<dyn SafetyOracle>, SafetyError> {
    let api_key = settings
        .api_key
        .as_deref()
        .ok_or_else(|| SafetyError::NotConfigured("SAFE_BROWSING_API_KEY not provided".into()))?;

    let mut oracle = SafeBrowsingOracle::new(api_key, settings.timeout, settings.policy)?;

    if let Some(path) = &settings.threat_list_path {
        oracle = oracle.with_threat_list(ThreatList::load(path)?);
    }

    Ok(Arc::new(oracle))
}
