pub mod oauth;
pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::types::RecordId;

pub use oauth::{OAuthClients, OAuthProfile, OAuthProvider};

/// OAuth state tokens only need to survive one round trip to the provider
const STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(jsonwebtoken::errors::Error),

    #[error("{0}")]
    InvalidToken(jsonwebtoken::errors::Error),

    #[error("Invalid OAuth state")]
    InvalidState,

    #[error("{0} OAuth is not configured")]
    ProviderDisabled(&'static str),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("OAuth provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Bearer token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: RecordId,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    provider: String,
    nonce: String,
    iat: i64,
    exp: i64,
}

/// HS256 signing material plus token lifetime
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    pub fn issue(&self, id: RecordId, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours as i64)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(AuthError::TokenGeneration)
    }

    /// Signature and expiry are both checked
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }

    /// Signed, short-lived `state` for an OAuth round trip to `provider`
    pub fn issue_state(&self, provider: OAuthProvider) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = StateClaims {
            provider: provider.slug().to_string(),
            nonce: password::random_token(16),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(STATE_TTL_MINUTES)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(AuthError::TokenGeneration)
    }

    pub fn verify_state(&self, state: &str, provider: OAuthProvider) -> Result<(), AuthError> {
        let claims = decode::<StateClaims>(state, &self.decoding, &Validation::default())
            .map_err(|_| AuthError::InvalidState)?
            .claims;
        if claims.provider != provider.slug() {
            return Err(AuthError::InvalidState);
        }
        Ok(())
    }
}
