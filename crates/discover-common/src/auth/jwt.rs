//! Bearer identity tokens
//!
//! The subject of every token is the viewer's [`UserKey`]. Tokens are minted
//! by the identity provider in production; [`JwtService::issue`] exists for
//! development sign-in and tests.

use chrono::{Duration, Utc};
use discover_core::UserKey;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user key)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Get the subject as a user key
    ///
    /// # Errors
    /// Returns an error if the subject is not an email-like identifier
    pub fn user_key(&self) -> Result<UserKey, AppError> {
        UserKey::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// A freshly issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// JWT service for issuing and validating identity tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry,
        }
    }

    /// Issue a token for a user key
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue(&self, key: &UserKey) -> Result<AccessToken, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: key.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.token_expiry)).timestamp(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode JWT: {e}")))?;

        Ok(AccessToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_expiry,
        })
    }

    /// Decode and validate a token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    /// Validate a token and return the identity it carries
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or has a malformed subject
    pub fn identify(&self, token: &str) -> Result<UserKey, AppError> {
        self.validate(token)?.user_key()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 900)
    }

    #[test]
    fn test_issue_and_identify() {
        let svc = service();
        let key = UserKey::parse("viewer@site.io").unwrap();

        let token = svc.issue(&key).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 900);

        assert_eq!(svc.identify(&token.access_token).unwrap(), key);
        assert!(!svc.validate(&token.access_token).unwrap().is_expired());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let key = UserKey::parse("viewer@site.io").unwrap();
        let token = service().issue(&key).unwrap();

        let other = JwtService::new("a-completely-different-secret-value", 900);
        assert!(matches!(
            other.validate(&token.access_token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let svc = JwtService::new("test-secret-key-that-is-long-enough", -3600);
        let key = UserKey::parse("viewer@site.io").unwrap();
        let token = svc.issue(&key).unwrap();
        assert!(matches!(
            svc.validate(&token.access_token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_subject_must_be_user_key() {
        let claims = Claims {
            sub: "12345".to_string(),
            iat: 0,
            exp: i64::MAX,
        };
        assert!(matches!(claims.user_key(), Err(AppError::InvalidToken)));
    }
}
