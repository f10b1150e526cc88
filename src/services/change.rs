//! Input mapping
//!
//! Client payloads arrive as one input object per entity for both "add" and
//! "edit" operations. [`Change`] makes the distinction explicit: creates never
//! carry an id, updates always do.

use crate::errors::{CoreError, CoreResult};

#[derive(Clone, Debug, PartialEq)]
pub enum Change<P> {
    Create(P),
    Update { id: i32, payload: P },
}

impl<P> Change<P> {
    /// Build a create, discarding any id the client supplied.
    pub fn create(payload: P) -> Self {
        Change::Create(payload)
    }

    /// Build an update; the id is mandatory.
    pub fn update(entity: &str, id: Option<i32>, payload: P) -> CoreResult<Self> {
        match id {
            Some(id) => Ok(Change::Update { id, payload }),
            None => Err(CoreError::validation(format!(
                "{} id is required for an edit",
                entity
            ))),
        }
    }

    pub fn id(&self) -> Option<i32> {
        match self {
            Change::Create(_) => None,
            Change::Update { id, .. } => Some(*id),
        }
    }

    pub fn payload(&self) -> &P {
        match self {
            Change::Create(payload) => payload,
            Change::Update { payload, .. } => payload,
        }
    }

    pub fn into_payload(self) -> P {
        match self {
            Change::Create(payload) => payload,
            Change::Update { payload, .. } => payload,
        }
    }
}

/// Update instruction for a nullable column.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    /// `None` when the column is left alone, `Some(value)` otherwise.
    pub fn into_update(self) -> Option<Option<T>> {
        match self {
            Patch::Keep => None,
            Patch::Clear => Some(None),
            Patch::Set(value) => Some(Some(value)),
        }
    }

    /// Value for a freshly created row.
    pub fn into_initial(self) -> Option<T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Keep | Patch::Clear => None,
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        }
    }
}

/// Reject empty or whitespace-only required text.
pub fn require_non_blank(field: &str, value: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}
