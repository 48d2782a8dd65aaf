//! Google Safe Browsing v4 Lookup API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::service::{FailurePolicy, OracleMode, SafetyError, SafetyOracle, Verdict};
use super::threat_list::ThreatList;

const DEFAULT_ENDPOINT: &str = "https://safebrowsing.googleapis.com/v4/threatMatches:find";

const CLIENT_ID: &str = "url-shortener";

const THREAT_TYPES: [&str; 4] = [
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    client: ClientInfo<'a>,
    threat_info: ThreatInfo<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo<'a> {
    client_id: &'a str,
    client_version: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'a [&'a str],
    platform_types: [&'a str; 1],
    threat_entry_types: [&'a str; 1],
    threat_entries: Vec<ThreatEntry<'a>>,
}

#[derive(Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    threat_type: String,
}

fn build_request(url: &str) -> FindRequest<'_> {
    FindRequest {
        client: ClientInfo {
            client_id: CLIENT_ID,
            client_version: env!("CARGO_PKG_VERSION"),
        },
        threat_info: ThreatInfo {
            threat_types: &THREAT_TYPES,
            platform_types: ["ANY_PLATFORM"],
            threat_entry_types: ["URL"],
            threat_entries: vec![ThreatEntry { url }],
        },
    }
}

fn verdict_from(response: FindResponse) -> Verdict {
    if response.matches.is_empty() {
        return Verdict::Safe;
    }

    let mut threats: Vec<String> = response
        .matches
        .into_iter()
        .map(|m| m.threat_type)
        .collect();
    threats.sort();
    threats.dedup();

    Verdict::Unsafe { threats }
}

/// Safe Browsing client with an optional local threat list.
///
/// The local list is checked first; a match there is final and no request is
/// sent. The `reqwest::Client` is shared by all requests.
pub struct SafeBrowsingOracle {
    client: Client,
    api_key: String,
    endpoint: String,
    policy: FailurePolicy,
    threat_list: Option<ThreatList>,
}

impl SafeBrowsingOracle {
    /// Creates a client bound to the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError::NotConfigured`] if `api_key` is empty, or
    /// [`SafetyError::Request`] if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        timeout: Duration,
        policy: FailurePolicy,
    ) -> Result<Self, SafetyError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SafetyError::NotConfigured(
                "SAFE_BROWSING_API_KEY is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        info!(
            policy = %OracleMode::from(policy),
            timeout_ms = timeout.as_millis() as u64,
            "Safe Browsing lookups enabled"
        );

        Ok(Self {
            client,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            policy,
            threat_list: None,
        })
    }

    /// Points the client at another Lookup API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_threat_list(mut self, list: ThreatList) -> Self {
        info!(entries = list.len(), "Local threat list loaded");
        self.threat_list = Some(list);
        self
    }

    async fn lookup(&self, url: &str) -> Result<Verdict, SafetyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&build_request(url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Safe Browsing lookup rejected");
            return Err(SafetyError::Request(format!("HTTP {status}")));
        }

        let body: FindResponse = response.json().await?;
        Ok(verdict_from(body))
    }
}

#[async_trait]
impl SafetyOracle for SafeBrowsingOracle {
    fn mode(&self) -> OracleMode {
        self.policy.into()
    }

    async fn check(&self, url: &str) -> Result<Verdict, SafetyError> {
        if let Some(entry) = self.threat_list.as_ref().and_then(|l| l.find_match(url)) {
            debug!(url, entry = %entry, "URL matched local threat list");
            return Ok(Verdict::Unsafe {
                threats: vec!["LOCAL_THREAT_LIST".to_string()],
            });
        }

        let verdict = self.lookup(url).await?;
        debug!(url, safe = verdict.is_safe(), "Safe Browsing lookup completed");
        Ok(verdict)
    }
}
