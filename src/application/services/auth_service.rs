//! Authentication service for API tokens.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;
use serde_json::json;
use tracing::{info, warn};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const TOKEN_LEN: usize = 48;

/// Resolves bearer tokens to users.
///
/// Tokens are hashed with HMAC-SHA256 keyed by `signing_secret` before storage
/// and comparison, so a database dump alone cannot be used to forge or verify
/// tokens.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// `signing_secret` must match the value used when tokens were issued.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Returns the 64-character lowercase hex HMAC of a raw token.
    pub fn hash_token(&self, token: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes()).map_err(|e| {
            AppError::internal("Token hashing failed", json!({ "reason": e.to_string() }))
        })?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Resolves a raw token to its owner and updates `last_used_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let token_hash = self.hash_token(token)?;

        let user = self
            .repository
            .find_user_by_token(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({"reason": "Invalid or revoked token"}))
            })?;

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            warn!(user_id = user.id, error = %e, "Failed to update token last_used_at");
        }

        Ok(user)
    }

    /// Stores a token for `user_id` and returns it with the raw value.
    ///
    /// A random 48-character token is generated when `raw` is `None`. The raw
    /// value is never stored.
    pub async fn issue_token(
        &self,
        user_id: i64,
        name: &str,
        raw: Option<String>,
    ) -> Result<(String, ApiToken), AppError> {
        let raw = raw.unwrap_or_else(generate_token);
        let token_hash = self.hash_token(&raw)?;
        let token = self
            .repository
            .create_token(user_id, name, &token_hash)
            .await?;

        info!(token_id = token.id, user_id, name, "API token issued");
        Ok((raw, token))
    }
}

/// Generates a random alphanumeric token.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}
