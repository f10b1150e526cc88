use std::fmt;

use crate::auth::{Caller, HOST_ADMINISTRATOR};
use crate::errors::{CoreError, CoreResult};

/// Pure role membership query.
pub fn is_in_role(caller: &Caller, role: &str) -> bool {
    caller.is_in_role(role)
}

/// Fail with a Forbidden error unless the caller holds `role`.
pub fn ensure_role(caller: &Caller, role: &str) -> CoreResult<()> {
    if is_in_role(caller, role) {
        return Ok(());
    }

    Err(CoreError::forbidden(format!(
        "Unauthorized. You have to be a member of {} role to perform this operation.",
        role
    )))
}

/// Resolve the tenant new Projects and Tasks are written into.
///
/// Always derived from the caller, never from the payload.
pub fn require_tenant(caller: &Caller) -> CoreResult<i32> {
    caller.tenant_id.ok_or_else(|| {
        CoreError::forbidden(
            "Unauthorized. Your user is not associated with a tenant, so it cannot create tenant data.",
        )
    })
}

/// Which tenant's rows a caller may look up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TenantScope {
    /// Host administrators see every tenant.
    Any,
    Tenant(i32),
}

impl TenantScope {
    pub fn for_caller(caller: &Caller) -> CoreResult<Self> {
        if caller.is_host_administrator() {
            return Ok(Self::Any);
        }
        match caller.tenant_id {
            Some(tenant_id) => Ok(Self::Tenant(tenant_id)),
            None => Err(CoreError::forbidden(
                "Unauthorized. Your user is not associated with a tenant.",
            )),
        }
    }

    pub fn contains(&self, tenant_id: i32) -> bool {
        match self {
            Self::Any => true,
            Self::Tenant(scope) => *scope == tenant_id,
        }
    }
}

/// Named mutations exposed on the GraphQL mutation root.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MutationKind {
    AddTenant,
    EditTenant,
    AddUser,
    EditUser,
    AddProject,
    EditProject,
    AddTask,
    EditTask,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddTenant => "addTenant",
            Self::EditTenant => "editTenant",
            Self::AddUser => "addUser",
            Self::EditUser => "editUser",
            Self::AddProject => "addProject",
            Self::EditProject => "editProject",
            Self::AddTask => "addTask",
            Self::EditTask => "editTask",
        }
    }

    pub fn policy(&self) -> Policy {
        match self {
            Self::AddTenant | Self::EditTenant | Self::AddUser => Policy::Administrator,
            Self::EditUser => Policy::AdministratorOrSelf,
            Self::AddProject | Self::AddTask => Policy::TenantMember,
            Self::EditProject | Self::EditTask => Policy::TenantScopedLookup,
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate over (caller, target) that must hold before a mutation runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Policy {
    Administrator,
    AdministratorOrSelf,
    TenantMember,
    TenantScopedLookup,
}

impl Policy {
    pub fn evaluate(&self, caller: &Caller, target_id: Option<i32>) -> CoreResult<()> {
        match self {
            Policy::Administrator => ensure_role(caller, HOST_ADMINISTRATOR),
            Policy::AdministratorOrSelf => {
                if caller.is_host_administrator() {
                    return Ok(());
                }
                if caller.user_id.is_some() && caller.user_id == target_id {
                    return Ok(());
                }
                Err(CoreError::forbidden(format!(
                    "Unauthorized. You have to be a member of {} role to be able to edit any user, \
                     otherwise you can only edit your own user (id: {}).",
                    HOST_ADMINISTRATOR,
                    caller
                        .user_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "none".to_string())
                )))
            }
            Policy::TenantMember => require_tenant(caller).map(|_| ()),
            Policy::TenantScopedLookup => TenantScope::for_caller(caller).map(|_| ()),
        }
    }
}

/// Decides whether a caller may run a mutation.
pub trait Authorizer: Send + Sync {
    fn authorize(
        &self,
        caller: &Caller,
        mutation: MutationKind,
        target_id: Option<i32>,
    ) -> CoreResult<()>;
}

/// Evaluates the policy table in [`MutationKind::policy`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PolicyAuthorizer;

impl Authorizer for PolicyAuthorizer {
    fn authorize(
        &self,
        caller: &Caller,
        mutation: MutationKind,
        target_id: Option<i32>,
    ) -> CoreResult<()> {
        let result = mutation.policy().evaluate(caller, target_id);
        if let Err(err) = &result {
            tracing::warn!(
                mutation = %mutation,
                caller_id = ?caller.user_id,
                target_id = ?target_id,
                "authorization denied: {}",
                err.message()
            );
        }
        result
    }
}
