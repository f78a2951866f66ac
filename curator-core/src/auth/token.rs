//! Signed, time-limited session tokens.
//!
//! HS256 JWTs carrying the user id as subject. Expiry is the only
//! invalidation mechanism: there is no revocation list, and logout does
//! not shorten a token's life. Rotating the secret invalidates everything
//! outstanding at once.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use curator_common::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Fails with `Configuration` when the signing secret is empty.
    pub fn new(secret: &str) -> Result<Self, Error> {
        if secret.trim().is_empty() {
            return Err(Error::Configuration(
                "JWT_SECRET is not set".to_string(),
            ));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry boundaries matter here; the default 60s leeway would let
        // expired tokens linger.
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("token encoding failed: {}", e)))
    }

    /// Resolve a token back to its subject. Any failure — bad signature,
    /// malformed token, past expiry — is `Unauthorized`.
    pub fn validate(&self, token: &str) -> Result<Uuid, Error> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| Error::Unauthorized("invalid or expired token".to_string()))?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| Error::Unauthorized("invalid token subject".to_string()))
    }
}
