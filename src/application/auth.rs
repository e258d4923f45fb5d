//! Session validation and role gating for the admin console.
//!
//! The Google OAuth handshake itself happens upstream; whatever signed the
//! user in leaves a session row behind (token hash + expiry), and this
//! service validates the cookie-borne token against it.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{RepoError, UsersRepo};
use crate::domain::types::UserRole;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session token missing")]
    Missing,
    #[error("session token invalid")]
    Invalid,
    #[error("session expired")]
    Expired,
    #[error("administrator role required")]
    Forbidden,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// The signed-in identity attached to admin requests.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UsersRepo>,
}

impl SessionService {
    pub fn new(users: Arc<dyn UsersRepo>) -> Self {
        Self { users }
    }

    /// Validate a raw session token against the stored session rows.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Missing);
        }

        let session = self
            .users
            .find_session(&token_hash(token))
            .await?
            .ok_or(AuthError::Invalid)?;

        if session.expires_at <= OffsetDateTime::now_utc() {
            return Err(AuthError::Expired);
        }

        Ok(AuthenticatedUser {
            id: session.user.id,
            email: session.user.email,
            name: session.user.name,
            role: session.user.role,
        })
    }

    /// Authenticate and require an administrative role.
    pub async fn require_admin(
        &self,
        token: Option<&str>,
    ) -> Result<AuthenticatedUser, AuthError> {
        let token = token.ok_or(AuthError::Missing)?;
        let user = self.authenticate(token).await?;
        if !user.role.is_admin() {
            return Err(AuthError::Forbidden);
        }
        Ok(user)
    }
}

/// Sessions are stored by the SHA-256 hex digest of their token, so the
/// lookup never handles the raw secret beyond this hash.
pub fn token_hash(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut output = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write as _;
        let _ = write!(output, "{byte:02x}");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hash_is_stable_hex() {
        let hash = token_hash("session-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, token_hash("session-token"));
        assert_ne!(hash, token_hash("other-token"));
    }
}
