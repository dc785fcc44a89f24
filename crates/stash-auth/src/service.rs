//! Account registration and login.
//!
//! Passwords are hashed with Argon2id before they reach the user store,
//! and the stored hash never leaves this crate: users returned to
//! callers always have the hash cleared.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Serialize;
use stash_core::{Role, User};
use stash_storage::{DynUserStore, NewUser};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::{AuthError, AuthResult};
use crate::jwt::JwtService;

/// Successful login result handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// The signed identity token.
    pub token: String,
    /// Username the token was issued for.
    pub username: String,
    /// The user's role.
    pub role: Role,
    /// Token expiry (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Registration and login over a [`UserStore`](stash_storage::UserStore).
pub struct AuthService {
    users: DynUserStore,
    jwt: JwtService,
}

impl AuthService {
    /// Creates the service over the given user store and token service.
    #[must_use]
    pub fn new(users: DynUserStore, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Authenticates a user and issues a token.
    ///
    /// All failure modes — unknown username, wrong password, store or
    /// hashing faults — collapse to `None` so a caller cannot tell
    /// which credential was wrong. Usernames match case-insensitively.
    pub async fn login(&self, username: &str, password: &str) -> Option<LoginResponse> {
        let user = match self.users.find_by_username(username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(username, "login failed: unknown user");
                return None;
            }
            Err(e) => {
                debug!(username, error = %e, "login failed: user lookup error");
                return None;
            }
        };

        let parsed_hash = match PasswordHash::new(&user.password_hash) {
            Ok(hash) => hash,
            Err(e) => {
                debug!(username, error = %e, "login failed: stored hash unparseable");
                return None;
            }
        };
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            debug!(username, "login failed: password mismatch");
            return None;
        }

        let issued = match self.jwt.issue(&user) {
            Ok(issued) => issued,
            Err(e) => {
                debug!(username, error = %e, "login failed: token issuance error");
                return None;
            }
        };

        info!(username = %user.username, role = %user.role, "user logged in");
        Some(LoginResponse {
            token: issued.token,
            username: user.username,
            role: user.role,
            expires_at: issued.expires_at,
        })
    }

    /// Registers a new account.
    ///
    /// The returned user has its password hash cleared.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UsernameTaken` when the username is already
    /// registered (case-insensitively), `AuthError::Hashing` when the
    /// password cannot be hashed, and `AuthError::Storage` on store
    /// faults.
    pub async fn register(&self, username: &str, password: &str, role: Role) -> AuthResult<User> {
        if self.users.exists_by_username(username).await? {
            return Err(AuthError::username_taken(username));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::hashing(e.to_string()))?
            .to_string();

        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                password_hash,
                role,
            })
            .await?;

        info!(username = %user.username, role = %user.role, "user registered");
        Ok(user.without_password_hash())
    }

    /// Looks up a user by id, with the password hash cleared.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` on store faults.
    pub async fn get_user(&self, id: u64) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .find_by_id(id)
            .await?
            .map(User::without_password_hash))
    }
}
