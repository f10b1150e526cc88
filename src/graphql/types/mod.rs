pub mod project;
pub mod task;
pub mod tenant;
pub mod user;

pub use project::{Project, ProjectInput};
pub use task::{Task, TaskInput};
pub use tenant::{Tenant, TenantInput};
pub use user::{User, UserInput};

use async_graphql::MaybeUndefined;

use crate::services::Patch;

/// Absent keeps the stored value, `null` clears it.
impl<T> From<MaybeUndefined<T>> for Patch<T> {
    fn from(value: MaybeUndefined<T>) -> Self {
        match value {
            MaybeUndefined::Undefined => Patch::Keep,
            MaybeUndefined::Null => Patch::Clear,
            MaybeUndefined::Value(value) => Patch::Set(value),
        }
    }
}
