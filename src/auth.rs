//! Password hashing and bearer-token issuance.
//!
//! Tokens are HS256 JWTs carrying the user id in `sub`; passwords are
//! stored as bcrypt hashes and never serialized.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Default token lifetime: one hour, matching the original API.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// JWT claims for a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token authenticates.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Key material and token policy, shared across handlers.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl AuthKeys {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for a user id, expiring `ttl_secs` from `now_secs`.
    pub fn issue(&self, user_id: &str, now_secs: i64) -> ApiResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now_secs + self.ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(ApiError::internal)
    }

    /// Verify a token and return the authenticated user id.
    pub fn verify(&self, token: &str) -> ApiResult<String> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| ApiError::unauthorized("Token is not valid"))?;
        Ok(data.claims.sub)
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> ApiResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(ApiError::internal)
}

/// Check a candidate password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    bcrypt::verify(password, hash).map_err(ApiError::internal)
}

/// Extract the bearer token from an Authorization header value.
pub fn bearer_token(header: &str) -> ApiResult<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        return Err(ApiError::unauthorized(
            "Malformed token, authorization denied",
        ));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn keys() -> AuthKeys {
        AuthKeys::new("test-secret", DEFAULT_TOKEN_TTL_SECS)
    }

    #[test]
    fn issued_token_round_trips_to_user_id() {
        let keys = keys();
        let now = chrono::Utc::now().timestamp();

        let token = keys.issue("user-42", now).unwrap();
        let subject = keys.verify(&token).unwrap();

        assert_eq!(subject, "user-42");
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let long_ago = chrono::Utc::now().timestamp() - 7200;

        let token = keys.issue("user-42", long_ago).unwrap();
        let err = keys.verify(&token).unwrap_err();

        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = AuthKeys::new("other-secret", DEFAULT_TOKEN_TTL_SECS);
        let now = chrono::Utc::now().timestamp();

        let token = other.issue("user-42", now).unwrap();

        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("hunter2").unwrap();

        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        assert_eq!(bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert_eq!(bearer_token("abc.def").unwrap(), "abc.def");
        assert!(bearer_token("Bearer ").is_err());
    }
}
