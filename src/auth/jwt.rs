//! JWT token codec.
//!
//! Tokens are stateless: the service holds no token state, every request
//! re-verifies the signature and expiry against the server secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{UserHubError, UserHubResult};

/// JWT claims asserting "subject = this username, issued at iat, expires at exp".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

/// JWT token manager. Pure function of secret and clock; safe to clone
/// into every handler.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    /// Token validity duration in seconds.
    token_ttl_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret.
    pub fn new(secret: &str, issuer: String, token_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_ttl_secs,
        }
    }

    /// Get token validity in seconds.
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_secs
    }

    /// Issue a signed token for a username using the configured TTL.
    pub fn issue(&self, username: &str) -> UserHubResult<String> {
        self.issue_with_ttl(username, self.token_ttl_secs)
    }

    /// Issue a signed token with an explicit TTL in seconds.
    pub fn issue_with_ttl(&self, username: &str, ttl_secs: i64) -> UserHubResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_secs);

        let claims = Claims {
            sub: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| UserHubError::Internal(format!("Failed to issue token: {}", e)))
    }

    /// Validate a token's signature, expiry, and issuer, returning its claims.
    ///
    /// Any failure (malformed, mis-signed, expired) comes back as
    /// `Unauthorized`; the middleware degrades it to "no identity".
    pub fn validate(&self, token: &str) -> UserHubResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        // No grace period past exp
        validation.leeway = 0;

        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                UserHubError::Unauthorized(format!("Invalid token: {}", e))
            })?;

        Ok(token_data.claims)
    }

    /// Extract the claimed subject without re-verifying the signature.
    ///
    /// Callers must have already validated the token.
    pub fn subject_of(&self, token: &str) -> Option<String> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .ok()
    }
}
