pub mod authorization;
pub mod change;
pub mod identity_service;
pub mod project_service;
pub mod task_service;
pub mod tenant_service;
pub mod unit_of_work;
pub mod user_service;

pub use authorization::{Authorizer, MutationKind, Policy, PolicyAuthorizer, TenantScope};
pub use change::{Change, Patch};
pub use identity_service::{NewUser, PasswordPolicy, PasswordValidator, UserManager};
pub use project_service::{ProjectPayload, ProjectService};
pub use task_service::{TaskPayload, TaskService};
pub use tenant_service::{TenantPayload, TenantService};
pub use user_service::{UserPayload, UserService};
