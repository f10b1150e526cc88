use async_graphql::{Error, ErrorExtensions};

use crate::errors::{CoreError, CoreErrorKind};

/// Structured error builder for consistent error handling
pub struct StructuredError;

impl StructuredError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Error {
        let id = id.to_string();
        Error::new(format!("{} with id '{}' not found", entity, id)).extend_with(|_, e| {
            e.set("code", "NOT_FOUND");
            e.set("entity", entity);
            e.set("id", id.as_str());
        })
    }

    pub fn unauthorized(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "UNAUTHORIZED");
        })
    }

    pub fn forbidden(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "FORBIDDEN");
        })
    }

    pub fn identity(message: impl Into<String>, identity_code: Option<&str>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "IDENTITY_ERROR");
            if let Some(identity_code) = identity_code {
                e.set("identityCode", identity_code);
            }
        })
    }

    pub fn validation(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "VALIDATION_FAILED");
        })
    }

    pub fn database(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "DATABASE_ERROR");
        })
    }

    pub fn internal(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "INTERNAL_ERROR");
        })
    }
}

/// Map a domain error onto a GraphQL error with a `code` extension.
pub fn core_error_to_graphql_error(error: CoreError) -> Error {
    let field = |key: &str| {
        error
            .fields()
            .and_then(|fields| fields.get(key))
            .map(String::as_str)
    };

    match error.kind() {
        CoreErrorKind::NotFound => {
            match (field("entity"), field("id")) {
                (Some(entity), Some(id)) => StructuredError::not_found(entity, id),
                _ => Error::new(error.message()).extend_with(|_, e| {
                    e.set("code", "NOT_FOUND");
                }),
            }
        }
        CoreErrorKind::Forbidden => StructuredError::forbidden(error.message()),
        CoreErrorKind::Unauthorized => StructuredError::unauthorized(error.message()),
        CoreErrorKind::Identity => {
            StructuredError::identity(error.message(), field("identityCode"))
        }
        CoreErrorKind::Validation => StructuredError::validation(error.message()),
        CoreErrorKind::Storage => StructuredError::database(error.message()),
        CoreErrorKind::Internal => StructuredError::internal(error.message()),
    }
}
