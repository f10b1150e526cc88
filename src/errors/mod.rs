//! Error types for taskhub
//!
//! All domain operations return [`CoreResult`]. The error kind decides how the
//! failure is reported to GraphQL callers:
//!
//! - **Forbidden**: caller lacks the required role or does not own the record
//! - **Unauthorized**: no caller identity where one is required
//! - **Identity**: credential store rejected the operation (`code: description`)
//! - **NotFound**: edit target absent
//! - **Storage**: commit-level constraint violation
//! - **Validation**: malformed input
//! - **Internal**: anything else

pub mod core_error;
pub mod identity;

pub use core_error::{CoreError, CoreErrorKind};
pub use identity::{IdentityError, IdentityErrorCode, IdentityOutcome, IdentityResult};

/// Result type alias for domain operations
pub type CoreResult<T> = Result<T, CoreError>;
