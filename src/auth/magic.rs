// src/auth/magic.rs
use rusqlite::Connection;

use crate::auth::token::{generate_token_default, hash_token};
use crate::db::users;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct SignInConfig {
    /// TTL for sign-in links in seconds.
    pub ttl_secs: i64,
    /// Relative path used when building links, e.g. "/auth/magic".
    pub magic_path: String,
}

impl Default for SignInConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 15 * 60,
            magic_path: "/auth/magic".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedLink {
    pub email: String,
    pub user_id: i64,
    /// Raw token (never stored in DB).
    pub token: String,
    pub expires_at: i64,
    /// Relative URL like "/auth/magic?token=..."
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct RedeemedLink {
    pub user_id: i64,
    pub email: String,
}

/// Magic-link sign-in (signup and login unified). This deployment has no
/// mailer; the caller logs `issued.link` instead of sending it.
pub struct SignInService {
    cfg: SignInConfig,
}

impl SignInService {
    pub fn new(cfg: SignInConfig) -> Self {
        Self { cfg }
    }

    /// Trim + lowercase, minimal sanity check.
    pub fn normalize_email(email: &str) -> Result<String, ServerError> {
        let e = email.trim().to_lowercase();
        if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
            return Err(ServerError::Validation("Please enter a valid email".into()));
        }
        Ok(e)
    }

    fn build_link(&self, token: &str) -> String {
        format!("{}?token={}", self.cfg.magic_path, token)
    }

    /// Request a sign-in link: normalize the email, upsert the user, store
    /// only the token hash.
    pub fn request_link(
        &self,
        conn: &Connection,
        email: &str,
        now: i64,
    ) -> Result<IssuedLink, ServerError> {
        let email = Self::normalize_email(email)?;
        let user_id = users::get_or_create_user(conn, &email, now)?;

        let token = generate_token_default();
        let token_hash = hash_token(&token);
        let expires_at = now + self.cfg.ttl_secs;

        users::insert_magic_link(conn, user_id, &token_hash, now, expires_at)?;

        let link = self.build_link(&token);
        Ok(IssuedLink {
            email,
            user_id,
            token,
            expires_at,
            link,
        })
    }

    /// Redeem a sign-in link (transactional single-use).
    pub fn redeem(
        &self,
        conn: &mut Connection,
        token: &str,
        now: i64,
    ) -> Result<RedeemedLink, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing token".into()));
        }

        let token_hash = hash_token(token);
        let Some(user_id) = users::consume_magic_link(conn, &token_hash, now)? else {
            return Err(ServerError::Unauthorized("invalid or expired link".into()));
        };

        let email = users::get_user_email(conn, user_id)?;
        Ok(RedeemedLink { user_id, email })
    }
}
