//! Record service layer and startup wiring.
//!
//! [`RecordService`] maps wire request/response shapes onto the
//! repository contract and times every operation. The [`wiring`] module
//! resolves configuration into a fully layered store: backend of record
//! (in-memory or document database), wrapped in the three-tier caching
//! repository, plus the auth services.

pub mod dto;
pub mod error;
pub mod service;
pub mod wiring;

pub use dto::{CreateRecordRequest, RecordResponse, UpdateRecordRequest};
pub use error::{ServiceError, ServiceResult};
pub use service::RecordService;
pub use wiring::{build_auth_service, build_record_store};
