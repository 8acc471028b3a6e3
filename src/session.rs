// SPDX-License-Identifier: AGPL-3.0-or-later

//! Short-lived signed session tokens for the web layer.
//!
//! After a successful [`crate::LedgerStore::authenticate`], the web layer
//! issues a token bound to the account number only and stores *that* in the
//! session cookie. The raw password is never kept server-side between
//! requests; sensitive confirmations re-prompt for it.
//!
//! Tokens are HS256 JWTs with `sub` (account number), `iat`, `exp`, and a
//! random `jti`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SESSION_TTL_SECS;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account number the session is bound to.
    pub sub: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Random token id, so two logins never produce the same token.
    pub jti: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Expired, tampered, or otherwise unusable token. The message is
    /// uniform; the cause stays in the source chain.
    #[error("Session is no longer valid")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens with a shared HMAC secret.
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionSigner {
    /// Create a signer with the default token lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::seconds(DEFAULT_SESSION_TTL_SECS))
    }

    /// Create a signer with an explicit token lifetime.
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a token bound to `account_number`.
    pub fn issue(&self, account_number: &str) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: account_number.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(SessionError::Invalid)
    }

    /// Verify a token and return the bound account number.
    pub fn verify(&self, token: &str) -> Result<String, SessionError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(SessionError::Invalid)?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_returns_account_number() {
        let signer = SessionSigner::new(b"test-secret");
        let token = signer.issue("1000000001").unwrap();
        assert_eq!(signer.verify(&token).unwrap(), "1000000001");
    }

    #[test]
    fn tokens_are_unique_per_login() {
        let signer = SessionSigner::new(b"test-secret");
        let a = signer.issue("1000000001").unwrap();
        let b = signer.issue("1000000001").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let signer = SessionSigner::new(b"secret-a");
        let other = SessionSigner::new(b"secret-b");
        let token = signer.issue("1000000001").unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative TTL beats jsonwebtoken's default expiry leeway (60s).
        let signer = SessionSigner::with_ttl(b"test-secret", Duration::seconds(-120));
        let token = signer.issue("1000000001").unwrap();
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let signer = SessionSigner::new(b"test-secret");
        assert!(signer.verify("not.a.token").is_err());
    }
}
