//! Database error categorization and message formatting
//!
//! sea-orm surfaces most driver failures as stringly-typed runtime errors, so
//! categorization inspects the rendered message. The categories decide how a
//! failed commit is reported to GraphQL callers.

use sea_orm::DbErr;

/// Categories of database errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Query returned no results
    NotFound,

    /// Unique constraint violation
    UniqueViolation,

    /// Foreign key constraint violation
    ForeignKeyViolation,

    /// NOT NULL or CHECK constraint violation
    ConstraintViolation,

    /// Database connection error
    ConnectionError,

    /// Unknown/other database error
    Unknown,
}

impl DbErrorKind {
    pub fn from_db_err(err: &DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) => Self::NotFound,
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::ConnectionError,
            DbErr::Exec(_) | DbErr::Query(_) | DbErr::RecordNotInserted => {
                let msg = err.to_string().to_lowercase();
                if msg.contains("unique") || msg.contains("duplicate") {
                    Self::UniqueViolation
                } else if msg.contains("foreign key") {
                    Self::ForeignKeyViolation
                } else if msg.contains("not null") || msg.contains("check constraint") {
                    Self::ConstraintViolation
                } else {
                    Self::Unknown
                }
            }
            _ => Self::Unknown,
        }
    }

    /// Constraint failures are caused by the request payload rather than by
    /// the storage engine itself.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::UniqueViolation | Self::ForeignKeyViolation | Self::ConstraintViolation
        )
    }
}

/// Format a database error with the operation that raised it.
pub fn format_db_error(operation: &str, err: &DbErr) -> (DbErrorKind, String) {
    let kind = DbErrorKind::from_db_err(err);

    let message = match kind {
        DbErrorKind::NotFound => format!("{}: record not found", operation),
        DbErrorKind::UniqueViolation => format!("{}: duplicate key violation", operation),
        DbErrorKind::ForeignKeyViolation => {
            format!("{}: foreign key constraint violation", operation)
        }
        DbErrorKind::ConstraintViolation => format!("{}: constraint violation", operation),
        DbErrorKind::ConnectionError => format!("{}: database connection failed", operation),
        DbErrorKind::Unknown => format!("{}: database error - {}", operation, err),
    };

    (kind, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    fn exec(msg: &str) -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(msg.to_string()))
    }

    #[test]
    fn test_categorize_record_not_found() {
        let err = DbErr::RecordNotFound("Tenant not found".to_string());
        assert_eq!(DbErrorKind::from_db_err(&err), DbErrorKind::NotFound);
    }

    #[test]
    fn test_categorize_unique_violation() {
        let kind = DbErrorKind::from_db_err(&exec("UNIQUE constraint failed: users.email"));
        assert_eq!(kind, DbErrorKind::UniqueViolation);
        assert!(kind.is_constraint_violation());
    }

    #[test]
    fn test_categorize_foreign_key_violation() {
        let kind = DbErrorKind::from_db_err(&exec("FOREIGN KEY constraint failed"));
        assert_eq!(kind, DbErrorKind::ForeignKeyViolation);
    }

    #[test]
    fn test_categorize_not_null() {
        let kind = DbErrorKind::from_db_err(&exec("NOT NULL constraint failed: tasks.title"));
        assert_eq!(kind, DbErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_format_db_error() {
        let (kind, message) = format_db_error("commit project", &exec("UNIQUE constraint failed"));
        assert_eq!(kind, DbErrorKind::UniqueViolation);
        assert_eq!(message, "commit project: duplicate key violation");
    }
}
