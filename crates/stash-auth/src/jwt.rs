//! JWT token issuance and validation.
//!
//! Tokens are HS256-signed with a shared secret and carry the user's id,
//! username, and role. They are stateless: nothing is persisted, and
//! every protected call validates the presented token fresh against
//! signature, issuer, audience, and expiry with zero clock-skew
//! tolerance.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use stash_core::{Role, User};
use time::OffsetDateTime;
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Minimum length of the signing secret, in bytes.
///
/// Checked at service construction; a shorter secret is a configuration
/// error, not a runtime condition.
pub const MIN_SECRET_BYTES: usize = 32;

/// Default token lifetime.
const DEFAULT_EXPIRATION: Duration = Duration::from_secs(60 * 60);

/// Claims carried by a Stash identity token.
///
/// The role appears twice: under the standard `role` claim and the
/// short `rol` claim kept for compatibility with older clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// Subject: the user id, in decimal.
    pub sub: String,

    /// Username.
    pub name: String,

    /// The user's role.
    pub role: Role,

    /// Duplicate of `role` under the short claim name.
    pub rol: Role,

    /// Unique token id.
    pub jti: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl TokenClaims {
    /// Parses the subject back into a numeric user id.
    #[must_use]
    pub fn user_id(&self) -> Option<u64> {
        self.sub.parse().ok()
    }
}

/// Configuration for the JWT service.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared signing secret, at least [`MIN_SECRET_BYTES`] bytes.
    pub secret: String,
    /// Expected token issuer.
    pub issuer: String,
    /// Expected token audience.
    pub audience: String,
    /// Token lifetime from issuance.
    pub expiration: Duration,
}

impl JwtConfig {
    /// Creates a config with the default 60-minute expiration.
    #[must_use]
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            expiration: DEFAULT_EXPIRATION,
        }
    }

    /// Overrides the token lifetime.
    #[must_use]
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }
}

/// An issued token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The encoded, signed token.
    pub token: String,
    /// When the token expires (UTC).
    pub expires_at: OffsetDateTime,
}

/// Issues and validates HS256 identity tokens.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    expiration: Duration,
}

impl JwtService {
    /// Builds the service from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakSecret` when the secret is shorter than
    /// [`MIN_SECRET_BYTES`] bytes.
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        if config.secret.len() < MIN_SECRET_BYTES {
            return Err(AuthError::WeakSecret {
                minimum: MIN_SECRET_BYTES,
                actual: config.secret.len(),
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            audience: config.audience,
            expiration: config.expiration,
        })
    }

    /// Issues a token for `user`, expiring after the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Encoding` when token encoding fails.
    pub fn issue(&self, user: &User) -> AuthResult<IssuedToken> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + self.expiration;

        let claims = TokenClaims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: user.id.to_string(),
            name: user.username.clone(),
            role: user.role,
            rol: user.role,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::encoding(e.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Validates a token and returns its claims.
    ///
    /// Blank input is rejected without attempting a parse. Any validation
    /// failure — expired, bad signature, malformed, wrong issuer or
    /// audience — yields `None`; the reason is never exposed.
    #[must_use]
    pub fn validate(&self, token: &str) -> Option<TokenClaims> {
        if token.trim().is_empty() {
            return None;
        }

        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(error = %e, "token validation failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config() -> JwtConfig {
        JwtConfig::new(SECRET, "stash", "stash-clients")
    }

    fn service() -> JwtService {
        JwtService::new(config()).unwrap()
    }

    fn user() -> User {
        User::new(42, "alice", "hash", Role::Admin)
    }

    #[test]
    fn test_weak_secret_fails_fast() {
        let result = JwtService::new(JwtConfig::new("too-short", "stash", "stash-clients"));
        assert!(matches!(result, Err(AuthError::WeakSecret { .. })));

        // Exactly 32 bytes is enough
        assert!(JwtService::new(config()).is_ok());
    }

    #[test]
    fn test_issue_validate_round_trip() {
        let service = service();
        let issued = service.issue(&user()).unwrap();

        let claims = service.validate(&issued.token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.rol, Role::Admin);
        assert_eq!(claims.iss, "stash");
        assert_eq!(claims.aud, "stash-clients");
        assert_eq!(claims.exp, issued.expires_at.unix_timestamp());
    }

    #[test]
    fn test_blank_token_rejected_without_parsing() {
        let service = service();
        assert!(service.validate("").is_none());
        assert!(service.validate("   ").is_none());
        assert!(service.validate("\t\n").is_none());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = service();
        assert!(service.validate("not.a.jwt").is_none());
        assert!(service.validate("garbage").is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();

        // Sign claims with an exp strictly in the past using the
        // service's own secret
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = TokenClaims {
            iss: "stash".to_string(),
            aud: "stash-clients".to_string(),
            sub: "42".to_string(),
            name: "alice".to_string(),
            role: Role::Admin,
            rol: Role::Admin,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now - 200,
            exp: now - 100,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.validate(&token).is_none());
    }

    #[test]
    fn test_near_expiry_token_still_validates_with_zero_leeway() {
        // Expiry is exclusive: a token is dead only once exp is strictly
        // in the past.
        let service = service();

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = TokenClaims {
            iss: "stash".to_string(),
            aud: "stash-clients".to_string(),
            sub: "42".to_string(),
            name: "alice".to_string(),
            role: Role::User,
            rol: Role::User,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp: now + 2,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.validate(&token).is_some());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = service().issue(&user()).unwrap();

        let other = JwtService::new(JwtConfig::new(
            "ffffffffffffffffffffffffffffffff",
            "stash",
            "stash-clients",
        ))
        .unwrap();
        assert!(other.validate(&issued.token).is_none());
    }

    #[test]
    fn test_wrong_issuer_or_audience_rejected() {
        let issued = service().issue(&user()).unwrap();

        let wrong_issuer =
            JwtService::new(JwtConfig::new(SECRET, "other", "stash-clients")).unwrap();
        assert!(wrong_issuer.validate(&issued.token).is_none());

        let wrong_audience = JwtService::new(JwtConfig::new(SECRET, "stash", "other")).unwrap();
        assert!(wrong_audience.validate(&issued.token).is_none());
    }
}
