//! Authentication for the Stash server.
//!
//! Two pieces: [`JwtService`] issues and validates signed, expiring
//! identity tokens, and [`AuthService`] orchestrates credential
//! verification and registration on top of a
//! [`UserStore`](stash_storage::UserStore).
//!
//! Validation failures are never surfaced as errors — an invalid token
//! or bad credentials always degrade to an absent result, so callers
//! cannot distinguish why authentication failed (deliberate enumeration
//! resistance).

pub mod error;
pub mod jwt;
pub mod service;

pub use error::{AuthError, AuthResult};
pub use jwt::{IssuedToken, JwtConfig, JwtService, MIN_SECRET_BYTES, TokenClaims};
pub use service::{AuthService, LoginResponse};
