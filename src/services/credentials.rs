//! Credential service: password hashing and token handling
//!
//! Provides:
//! - Password hashing and verification with bcrypt (on the blocking pool)
//! - Signed HS256 JWT issuance
//! - Principal resolution from a bearer token

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::config::Config;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (subject)
    pub sub: String,
    /// Username
    pub username: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp, absent for non-expiring tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// The authenticated identity behind a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub username: String,
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct CredentialsConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds; `None` means tokens never expire
    pub token_lifetime: Option<i64>,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl From<&Config> for CredentialsConfig {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime: config.token_lifetime_secs,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

// ============================================================================
// Credential Service
// ============================================================================

#[derive(Clone)]
pub struct CredentialService {
    config: CredentialsConfig,
    /// Placeholder hash checked when there is no stored one, built on first use
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialService {
    pub fn new(config: CredentialsConfig) -> Self {
        Self {
            config,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Hash a password with a fresh random salt
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.config.bcrypt_cost;

        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .context("Password hashing task failed")?
            .map_err(|e| anyhow!("Failed to hash password: {}", e))
    }

    /// Verify a password against a stored hash
    pub async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();

        tokio::task::spawn_blocking(move || verify(password, &password_hash))
            .await
            .context("Password verification task failed")?
            .map_err(|e| anyhow!("Failed to verify password: {}", e))
    }

    /// Verify a password against a stored hash, if there is one.
    ///
    /// Without a stored hash a placeholder of the same cost is checked
    /// instead and the result is always `false`, so an unknown user costs
    /// the same bcrypt work as a wrong password.
    pub async fn verify_password_or_dummy(
        &self,
        password: &str,
        password_hash: Option<&str>,
    ) -> Result<bool> {
        if let Some(password_hash) = password_hash {
            return self.verify_password(password, password_hash).await;
        }

        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hash_password("placeholder-password"))
            .await?;
        self.verify_password(password, dummy).await?;
        Ok(false)
    }

    /// Issue a signed token for a principal
    pub fn issue_token(&self, principal: &Principal) -> Result<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: principal.id.clone(),
            username: principal.username.clone(),
            iat: now.timestamp(),
            exp: self
                .config
                .token_lifetime
                .map(|secs| (now + Duration::seconds(secs)).timestamp()),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| anyhow!("Failed to create token: {}", e))
    }

    /// Resolve the principal behind a token.
    ///
    /// Missing, malformed, tampered and expired tokens all resolve to `None`;
    /// rejecting the request is left to operations that need authentication.
    pub fn resolve_principal(&self, token: &str) -> Option<Principal> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        match decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => Some(Principal {
                id: data.claims.sub,
                username: data.claims.username,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid token");
                None
            }
        }
    }
}
