//! Credential store results
//!
//! Every identity operation reports an [`IdentityResult`] instead of failing
//! fast, so callers can decide whether to abort. [`IdentityResult::into_result`]
//! turns the first reported error into a [`CoreError`] of kind `Identity`.
//!
//! ```rust
//! use taskhub::errors::{IdentityError, IdentityErrorCode, IdentityResult};
//!
//! let result = IdentityResult::failed(vec![IdentityError::new(
//!     IdentityErrorCode::DuplicateUserName,
//!     "User name 'ada' is already taken.",
//! )]);
//! let err = result.into_result().unwrap_err();
//! assert_eq!(err.message(), "DuplicateUserName: User name 'ada' is already taken.");
//! ```

use std::fmt;

use thiserror::Error;

use crate::errors::{CoreError, CoreResult};

/// Machine-readable identity failure codes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IdentityErrorCode {
    DuplicateUserName,
    DuplicateEmail,
    InvalidUserName,
    InvalidEmail,
    PasswordTooShort,
    PasswordRequiresDigit,
    PasswordRequiresLower,
    PasswordRequiresUpper,
    PasswordRequiresNonAlphanumeric,
    PasswordRequiresUniqueChars,
    UserAlreadyHasPassword,
    PasswordHashFailed,
}

impl IdentityErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateUserName => "DuplicateUserName",
            Self::DuplicateEmail => "DuplicateEmail",
            Self::InvalidUserName => "InvalidUserName",
            Self::InvalidEmail => "InvalidEmail",
            Self::PasswordTooShort => "PasswordTooShort",
            Self::PasswordRequiresDigit => "PasswordRequiresDigit",
            Self::PasswordRequiresLower => "PasswordRequiresLower",
            Self::PasswordRequiresUpper => "PasswordRequiresUpper",
            Self::PasswordRequiresNonAlphanumeric => "PasswordRequiresNonAlphanumeric",
            Self::PasswordRequiresUniqueChars => "PasswordRequiresUniqueChars",
            Self::UserAlreadyHasPassword => "UserAlreadyHasPassword",
            Self::PasswordHashFailed => "PasswordHashFailed",
        }
    }
}

impl fmt::Display for IdentityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported identity failure
#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("{code}: {description}")]
pub struct IdentityError {
    pub code: IdentityErrorCode,
    pub description: String,
}

impl IdentityError {
    pub fn new(code: IdentityErrorCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

/// Outcome of a credential store operation
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IdentityResult {
    succeeded: bool,
    errors: Vec<IdentityError>,
}

impl IdentityResult {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            errors: Vec::new(),
        }
    }

    pub fn failed(errors: Vec<IdentityError>) -> Self {
        Self {
            succeeded: false,
            errors,
        }
    }

    /// Success when `errors` is empty, failure otherwise.
    pub fn from_errors(errors: Vec<IdentityError>) -> Self {
        if errors.is_empty() {
            Self::success()
        } else {
            Self::failed(errors)
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn errors(&self) -> &[IdentityError] {
        &self.errors
    }

    pub fn into_result(self) -> CoreResult<()> {
        if self.succeeded {
            return Ok(());
        }
        Err(self.into_error())
    }

    /// Translate the first reported error; used on results known to have failed.
    pub fn into_error(self) -> CoreError {
        match self.errors.into_iter().next() {
            Some(error) => CoreError::identity(error),
            None => CoreError::identity_unspecified(),
        }
    }
}

/// Value produced by a credential store operation, or the reasons it failed.
pub type IdentityOutcome<T> = Result<T, IdentityResult>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    #[test]
    fn success_converts_to_ok() {
        assert!(IdentityResult::success().into_result().is_ok());
        assert!(IdentityResult::from_errors(Vec::new()).succeeded());
    }

    #[test]
    fn first_error_wins() {
        let result = IdentityResult::failed(vec![
            IdentityError::new(IdentityErrorCode::PasswordTooShort, "too short"),
            IdentityError::new(IdentityErrorCode::PasswordRequiresDigit, "needs digit"),
        ]);
        let err = result.into_result().unwrap_err();
        assert_eq!(err.kind(), CoreErrorKind::Identity);
        assert_eq!(err.message(), "PasswordTooShort: too short");
    }

    #[test]
    fn failure_without_errors_uses_fallback() {
        let err = IdentityResult::failed(Vec::new()).into_result().unwrap_err();
        assert_eq!(err.kind(), CoreErrorKind::Identity);
        assert_eq!(err.message(), "Identity error");
    }
}
