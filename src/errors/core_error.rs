use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use sea_orm::DbErr;

use crate::common::db_errors::{format_db_error, DbErrorKind};
use crate::errors::identity::IdentityError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoreErrorKind {
    NotFound,
    Validation,
    Forbidden,
    Unauthorized,
    Identity,
    Storage,
    Internal,
}

#[derive(Debug)]
pub struct CoreError {
    kind: CoreErrorKind,
    message: String,
    fields: Option<BTreeMap<String, String>>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CoreError {
    pub fn new(kind: CoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: None,
            source: None,
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        let entity = entity.into();
        let id = id.into();
        let message = format!("{} with id '{}' not found", entity, id);

        let mut fields = BTreeMap::new();
        fields.insert("entity".to_string(), entity);
        fields.insert("id".to_string(), id);

        Self {
            kind: CoreErrorKind::NotFound,
            message,
            fields: Some(fields),
            source: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Validation, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Forbidden, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Unauthorized, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Storage, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Internal, message)
    }

    /// Identity failures keep their code in the fields map so the API layer
    /// can expose it separately from the `code: description` message.
    pub fn identity(error: IdentityError) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("identityCode".to_string(), error.code.to_string());

        Self {
            kind: CoreErrorKind::Identity,
            message: error.to_string(),
            fields: Some(fields),
            source: None,
        }
    }

    /// Fallback for a failed identity result that reported no errors.
    pub fn identity_unspecified() -> Self {
        Self::new(CoreErrorKind::Identity, "Identity error")
    }

    /// Categorise a sea-orm error raised while performing `operation`.
    pub fn from_db(operation: &str, err: DbErr) -> Self {
        let (kind, message) = format_db_error(operation, &err);
        let core_kind = match kind {
            DbErrorKind::NotFound => CoreErrorKind::NotFound,
            _ => CoreErrorKind::Storage,
        };
        Self::new(core_kind, message).with_source(err)
    }

    pub fn with_fields(mut self, fields: BTreeMap<String, String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> CoreErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> Option<&BTreeMap<String, String>> {
        self.fields.as_ref()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == CoreErrorKind::NotFound
    }

    pub fn is_forbidden(&self) -> bool {
        self.kind == CoreErrorKind::Forbidden
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl StdError for CoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<DbErr> for CoreError {
    fn from(err: DbErr) -> Self {
        CoreError::from_db("database operation", err)
    }
}

impl From<IdentityError> for CoreError {
    fn from(err: IdentityError) -> Self {
        CoreError::identity(err)
    }
}

impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        CoreError::internal(format!("{:#}", err))
    }
}
