//! JWT-backed identity provider (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::identity::{Identity, IdentityProvider, ResetClaims};
use crate::error::AppError;

const PURPOSE_SESSION: &str = "session";
const PURPOSE_PASSWORD_RESET: &str = "password_reset";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    purpose: String,
    iat: i64,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fp: Option<String>,
}

/// Issues and verifies HS256 tokens for sessions and password resets.
///
/// Session and reset tokens are signed with the same key and told apart by the
/// `purpose` claim, so one can never be used in place of the other.
pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
    reset_ttl: Duration,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str, session_ttl: Duration, reset_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl,
            reset_ttl,
        }
    }

    fn issue(
        &self,
        account_id: i64,
        email: &str,
        purpose: &str,
        ttl: Duration,
        fp: Option<String>,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            purpose: purpose.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            fp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal("Failed to issue token", json!({ "reason": e.to_string() }))
        })
    }

    fn verify(&self, token: &str, purpose: &str) -> Result<(i64, Claims), AppError> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                invalid_token()
            })?
            .claims;

        if claims.purpose != purpose {
            return Err(invalid_token());
        }

        let account_id = claims.sub.parse::<i64>().map_err(|_| invalid_token())?;

        Ok((account_id, claims))
    }
}

fn invalid_token() -> AppError {
    AppError::unauthorized("Invalid or expired token", json!({}))
}

impl IdentityProvider for JwtIdentityProvider {
    fn issue_session(&self, account_id: i64, email: &str) -> Result<String, AppError> {
        self.issue(account_id, email, PURPOSE_SESSION, self.session_ttl, None)
    }

    fn verify_session(&self, token: &str) -> Result<Identity, AppError> {
        let (account_id, claims) = self.verify(token, PURPOSE_SESSION)?;

        Ok(Identity {
            account_id,
            email: claims.email,
        })
    }

    fn issue_reset(
        &self,
        account_id: i64,
        email: &str,
        fingerprint: &str,
    ) -> Result<String, AppError> {
        self.issue(
            account_id,
            email,
            PURPOSE_PASSWORD_RESET,
            self.reset_ttl,
            Some(fingerprint.to_string()),
        )
    }

    fn verify_reset(&self, token: &str) -> Result<ResetClaims, AppError> {
        let (account_id, claims) = self.verify(token, PURPOSE_PASSWORD_RESET)?;
        let fingerprint = claims.fp.ok_or_else(invalid_token)?;

        Ok(ResetClaims {
            account_id,
            email: claims.email,
            fingerprint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_bytes_long!!!";

    fn provider() -> JwtIdentityProvider {
        JwtIdentityProvider::new(SECRET, Duration::hours(168), Duration::minutes(15))
    }

    #[test]
    fn test_session_round_trip() {
        let provider = provider();
        let token = provider.issue_session(7, "a@example.com").unwrap();
        let identity = provider.verify_session(&token).unwrap();

        assert_eq!(
            identity,
            Identity {
                account_id: 7,
                email: "a@example.com".to_string()
            }
        );
    }

    #[test]
    fn test_reset_round_trip_carries_fingerprint() {
        let provider = provider();
        let token = provider.issue_reset(7, "a@example.com", "abc123").unwrap();
        let claims = provider.verify_reset(&token).unwrap();

        assert_eq!(claims.account_id, 7);
        assert_eq!(claims.fingerprint, "abc123");
    }

    #[test]
    fn test_reset_token_rejected_as_session() {
        let provider = provider();
        let token = provider.issue_reset(7, "a@example.com", "fp").unwrap();

        assert!(matches!(
            provider.verify_session(&token),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_session_token_rejected_as_reset() {
        let provider = provider();
        let token = provider.issue_session(7, "a@example.com").unwrap();

        assert!(provider.verify_reset(&token).is_err());
    }

    #[test]
    fn test_invalid_token_rejected() {
        assert!(provider().verify_session("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = JwtIdentityProvider::new(
            "different_secret_key_32_bytes!!!",
            Duration::hours(1),
            Duration::minutes(15),
        );
        let token = provider().issue_session(7, "a@example.com").unwrap();

        assert!(other.verify_session(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = JwtIdentityProvider::new(SECRET, Duration::hours(-2), Duration::minutes(15));
        let token = expired.issue_session(7, "a@example.com").unwrap();

        assert!(provider().verify_session(&token).is_err());
    }
}
