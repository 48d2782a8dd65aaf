//! Counters emitted through the `metrics` facade.
//!
//! No recorder is installed by this crate; without one these calls are no-ops.

use metrics::counter;

pub fn increment_link_created() {
    counter!("links_created_total").increment(1);
}

pub fn increment_link_resolved() {
    counter!("links_resolved_total").increment(1);
}

/// `outcome` is one of `safe`, `unsafe`, `error_blocked`, `error_passed`, `skipped`.
pub fn record_safety_check(outcome: &'static str) {
    counter!("safety_checks_total", "outcome" => outcome).increment(1);
}

pub fn increment_token_refreshed() {
    counter!("tokens_refreshed_total").increment(1);
}
