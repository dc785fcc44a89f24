//! Core domain types for the Stash server.
//!
//! This crate holds the `Record` and `User` entities shared by every other
//! crate in the workspace, along with the core error type. It deliberately
//! has no async or storage dependencies.

pub mod error;
pub mod record;
pub mod user;

pub use error::{CoreError, Result};
pub use record::{Record, RECORD_VALUE_MAX_LEN};
pub use user::{Role, User};
