//! JWT issuing and verification.
//!
//! Tokens are signed with HS256 using the shared `JWT_SECRET` and carry the
//! user's id and email.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, models::user::User};

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: Uuid,
    pub email: String,

    /// Expiry as a Unix timestamp (seconds)
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Sign a token for `user`, valid for the configured lifetime.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let claims = TokenClaims {
            id: user.id,
            email: user.email.clone(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        let data = decode::<TokenClaims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::DEFAULT_AVATAR_PATH;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "keks".into(),
            email: "keks@example.com".into(),
            password_hash: String::new(),
            avatar_path: DEFAULT_AVATAR_PATH.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_carries_user_identity() {
        let service = JwtService::new("secret", 48);
        let user = user();

        let claims = service.verify(&service.issue(&user).unwrap()).unwrap();

        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = JwtService::new("one", 48).issue(&user()).unwrap();

        assert!(JwtService::new("two", 48).verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well beyond the default 60s leeway
        let service = JwtService::new("secret", -1);
        let token = service.issue(&user()).unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(JwtService::new("secret", 48).verify("not.a.token").is_err());
    }
}
