//! Signed bearer tokens: issue, validate, refresh.
//!
//! Tokens are HS256 JWTs carrying `{user_id, iat, exp}`. Nothing is stored
//! server-side; expiry is the only invalidation. An expired token can be
//! exchanged for a fresh one while it is at most `grace` past its expiry.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::services::access_guard::{Identity, IdentityStrategy};
use crate::error::AppError;
use crate::utils::counters;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Result of a signature-valid decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid(Claims),
    /// Signature checks out but `now >= exp`.
    Expired(Claims),
}

impl TokenStatus {
    pub fn claims(&self) -> &Claims {
        match self {
            Self::Valid(c) | Self::Expired(c) => c,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token is malformed or its signature is invalid")]
    Invalid,

    #[error("Token expired beyond the refresh window")]
    ExpiredBeyondGrace,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid => AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Invalid token" }),
            ),
            TokenError::ExpiredBeyondGrace => AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Token expired" }),
            ),
            TokenError::Signing(reason) => {
                tracing::error!(%reason, "Token signing failed");
                AppError::internal("Failed to issue token", json!({}))
            }
        }
    }
}

/// A freshly minted token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and checks bearer tokens with one HMAC key.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    grace: Duration,
}

impl TokenService {
    /// Creates the service.
    ///
    /// # Arguments
    ///
    /// - `secret` - HMAC signing key, resolved once from configuration
    /// - `ttl` - lifetime of minted tokens
    /// - `grace` - how long after expiry a token may still be refreshed
    pub fn new(secret: &[u8], ttl: std::time::Duration, grace: std::time::Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock so expired claims can be returned.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            grace: Duration::from_std(grace).unwrap_or(Duration::MAX),
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Mints a token for `user_id` as of `now`.
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("token lifetime overflows".to_string()))?;

        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);

        Ok(IssuedToken { token, expires_at })
    }

    pub fn validate(&self, token: &str) -> Result<TokenStatus, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Verifies the signature, then classifies the token against `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for any structural or signature failure.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenStatus, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            TokenError::Invalid
        })?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            Ok(TokenStatus::Expired(claims))
        } else {
            Ok(TokenStatus::Valid(claims))
        }
    }

    pub fn refresh(&self, token: &str) -> Result<IssuedToken, TokenError> {
        self.refresh_at(token, Utc::now())
    }

    /// Exchanges a valid or recently expired token for a new one.
    ///
    /// The signature is always re-verified. A token whose expiry is exactly
    /// `grace` in the past is still accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] if the signature fails and
    /// [`TokenError::ExpiredBeyondGrace`] if the token is too old.
    pub fn refresh_at(&self, token: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let claims = match self.validate_at(token, now)? {
            TokenStatus::Valid(c) => c,
            TokenStatus::Expired(c) => {
                let overdue = now.timestamp().saturating_sub(c.exp);
                if overdue > self.grace.num_seconds() {
                    return Err(TokenError::ExpiredBeyondGrace);
                }
                c
            }
        };

        self.issue_at(claims.user_id, now)
    }

    /// Validates and, when expired, refreshes exactly once.
    pub fn identify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        match self.validate_at(token, now)? {
            TokenStatus::Valid(claims) => Ok(Identity::new(claims.user_id)),
            TokenStatus::Expired(claims) => {
                let fresh = self.refresh_at(token, now)?;
                counters::increment_token_refreshed();
                tracing::debug!(user_id = claims.user_id, "Expired token refreshed");
                Ok(Identity::refreshed(claims.user_id, fresh.token))
            }
        }
    }
}

#[async_trait]
impl IdentityStrategy for TokenService {
    type Credential = str;

    async fn identify(&self, credential: &str) -> Result<Identity, AppError> {
        Ok(self.identify_at(credential, Utc::now())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: std::time::Duration = std::time::Duration::from_secs(86_400);

    fn service() -> TokenService {
        TokenService::new(b"test-secret", DAY, DAY)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_then_validate() {
        let svc = service();
        let issued = svc.issue_at(7, t0()).unwrap();

        let status = svc.validate_at(&issued.token, t0()).unwrap();
        assert_eq!(
            status,
            TokenStatus::Valid(Claims {
                user_id: 7,
                iat: t0().timestamp(),
                exp: (t0() + Duration::days(1)).timestamp(),
            })
        );
        assert_eq!(issued.expires_at, t0() + Duration::days(1));
    }

    #[test]
    fn test_expiry_instant_is_expired() {
        let svc = service();
        let issued = svc.issue_at(7, t0()).unwrap();

        let just_before = t0() + Duration::days(1) - Duration::seconds(1);
        let at_expiry = t0() + Duration::days(1);

        assert!(matches!(svc.validate_at(&issued.token, just_before), Ok(TokenStatus::Valid(_))));
        assert!(matches!(svc.validate_at(&issued.token, at_expiry), Ok(TokenStatus::Expired(_))));
    }

    #[test]
    fn test_expired_token_keeps_subject() {
        let svc = service();
        let issued = svc.issue_at(42, t0()).unwrap();

        let status = svc.validate_at(&issued.token, t0() + Duration::days(30)).unwrap();
        assert!(matches!(status, TokenStatus::Expired(_)));
        assert_eq!(status.claims().user_id, 42);
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let svc = service();
        let issued = svc.issue_at(7, t0()).unwrap();

        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let forged_payload = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            format!(r#"{{"user_id":1,"iat":{0},"exp":{1}}}"#, t0().timestamp(), t0().timestamp() + 60),
        );
        parts[1] = &forged_payload;
        let forged = parts.join(".");

        assert!(matches!(svc.validate_at(&forged, t0()), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let issued = service().issue_at(7, t0()).unwrap();
        let other = TokenService::new(b"another-secret", DAY, DAY);

        assert!(matches!(other.validate_at(&issued.token, t0()), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(service().validate_at("not.a.jwt", t0()), Err(TokenError::Invalid)));
        assert!(matches!(service().validate_at("", t0()), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_refresh_valid_token() {
        let svc = service();
        let issued = svc.issue_at(7, t0()).unwrap();

        let later = t0() + Duration::hours(3);
        let fresh = svc.refresh_at(&issued.token, later).unwrap();

        assert_eq!(fresh.expires_at, later + Duration::days(1));
        assert_eq!(svc.validate_at(&fresh.token, later).unwrap().claims().user_id, 7);
    }

    #[test]
    fn test_refresh_grace_boundary_is_inclusive() {
        let svc = service();
        let issued = svc.issue_at(7, t0()).unwrap();
        let exp = t0() + Duration::days(1);

        let at_boundary = exp + Duration::days(1);
        let fresh = svc.refresh_at(&issued.token, at_boundary).unwrap();
        assert!(matches!(svc.validate_at(&fresh.token, at_boundary), Ok(TokenStatus::Valid(_))));

        let past_boundary = at_boundary + Duration::seconds(1);
        assert!(matches!(
            svc.refresh_at(&issued.token, past_boundary),
            Err(TokenError::ExpiredBeyondGrace)
        ));
    }

    #[test]
    fn test_refresh_rechecks_signature() {
        let issued = TokenService::new(b"another-secret", DAY, DAY).issue_at(7, t0()).unwrap();
        assert!(matches!(
            service().refresh_at(&issued.token, t0() + Duration::days(1)),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_identify_refreshes_expired_token_once() {
        let svc = service();
        let issued = svc.issue_at(7, t0()).unwrap();

        let valid = svc.identify_at(&issued.token, t0()).unwrap();
        assert_eq!(valid, Identity::new(7));

        let later = t0() + Duration::days(1) + Duration::hours(1);
        let refreshed = svc.identify_at(&issued.token, later).unwrap();
        assert_eq!(refreshed.user_id, 7);

        let replacement = refreshed.replacement_credential.unwrap();
        assert!(matches!(svc.validate_at(&replacement, later), Ok(TokenStatus::Valid(_))));
    }

    #[test]
    fn test_identify_beyond_grace_is_unauthorized() {
        let svc = service();
        let issued = svc.issue_at(7, t0()).unwrap();

        let err = svc.identify_at(&issued.token, t0() + Duration::days(3)).unwrap_err();
        assert!(matches!(AppError::from(err), AppError::Unauthorized { .. }));
    }
}
