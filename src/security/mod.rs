use crate::config::SecurityConfig;
use crate::db::models::account_models::AuthToken;
use crate::error::Error;
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod password;
pub mod policy;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Token service issuing and verifying signed session tokens
pub struct TokenService {
    config: SecurityConfig,
}

impl TokenService {
    /// Create a new token service
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    /// Issue a token for a subject with the configured lifetime
    pub fn issue_token(&self, subject: &str) -> Result<AuthToken> {
        self.issue_token_with_ttl(subject, Duration::minutes(self.config.token_ttl_minutes as i64))
    }

    /// Issue a token for a subject with an explicit lifetime
    pub fn issue_token_with_ttl(&self, subject: &str, ttl: Duration) -> Result<AuthToken> {
        let now = Utc::now();
        let expiration = now + ttl;

        let claims = Claims {
            sub: subject.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Unauthenticated(format!("Failed to generate token: {}", e)))?;

        Ok(AuthToken {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: ttl.num_seconds().max(0) as u64,
        })
    }

    /// Validate a token and return its claims.
    /// Every failure (bad signature, expired, garbage) maps to the same
    /// uniform authentication error; callers cannot tell them apart.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| Error::Unauthenticated("Invalid credentials".to_string()))?;

        Ok(token_data.claims)
    }
}
