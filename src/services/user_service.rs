use std::sync::Arc;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::{debug, info};

use crate::auth::Caller;
use crate::database::entities::users;
use crate::errors::{CoreError, CoreResult, IdentityResult};
use crate::services::authorization::{Authorizer, MutationKind, TenantScope};
use crate::services::change::{require_non_blank, Change, Patch};
use crate::services::identity_service::{NewUser, UserManager};
use crate::services::{tenant_service, unit_of_work};

/// Partial user update; every field is optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserPayload {
    pub user_name: Option<String>,
    pub email: Patch<String>,
    pub display_name: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
    pub tenant_id: Patch<i32>,
    pub is_active: Option<bool>,
}

impl UserPayload {
    /// Whether the payload touches fields only administrators may set.
    pub fn has_privileged_fields(&self) -> bool {
        self.roles.is_some() || !self.tenant_id.is_keep() || self.is_active.is_some()
    }
}

#[derive(Clone)]
pub struct UserService {
    db: DatabaseConnection,
    authorizer: Arc<dyn Authorizer>,
    user_manager: Arc<UserManager>,
}

impl UserService {
    pub fn new(
        db: DatabaseConnection,
        authorizer: Arc<dyn Authorizer>,
        user_manager: Arc<UserManager>,
    ) -> Self {
        Self {
            db,
            authorizer,
            user_manager,
        }
    }

    pub async fn save(&self, caller: &Caller, change: Change<UserPayload>) -> CoreResult<users::Model> {
        let mutation = match change {
            Change::Create(_) => MutationKind::AddUser,
            Change::Update { .. } => MutationKind::EditUser,
        };
        self.authorizer.authorize(caller, mutation, change.id())?;

        if !caller.is_host_administrator() && change.payload().has_privileged_fields() {
            return Err(CoreError::forbidden(
                "Unauthorized. Only members of HostAdministrator role can change roles, tenant or active state of a user.",
            ));
        }

        let txn = unit_of_work::begin(&self.db).await?;
        let outcome = match change {
            Change::Create(payload) => self.create(&txn, payload).await,
            Change::Update { id, payload } => self.update(&txn, id, payload).await,
        };
        let user = unit_of_work::finish(txn, outcome).await?;

        info!(
            operation = %mutation,
            user_id = user.id,
            tenant_id = ?user.tenant_id,
            caller_id = ?caller.user_id,
            "User saved"
        );
        Ok(user)
    }

    /// The caller's own user record.
    pub async fn me(&self, caller: &Caller) -> CoreResult<users::Model> {
        let id = caller
            .user_id
            .ok_or_else(|| CoreError::unauthorized("No authenticated user"))?;
        find_by_id(&self.db, id).await
    }

    /// Administrators see any user, others only themselves and their tenant.
    pub async fn get(&self, caller: &Caller, id: i32) -> CoreResult<users::Model> {
        let user = find_by_id(&self.db, id).await?;
        if caller.user_id == Some(user.id) {
            return Ok(user);
        }

        let scope = TenantScope::for_caller(caller)?;
        match user.tenant_id {
            Some(tenant_id) if scope.contains(tenant_id) => Ok(user),
            None if scope == TenantScope::Any => Ok(user),
            _ => Err(CoreError::not_found("User", id.to_string())),
        }
    }

    pub async fn list(&self, caller: &Caller) -> CoreResult<Vec<users::Model>> {
        let scope = TenantScope::for_caller(caller)?;
        let mut query = users::Entity::find().order_by_asc(users::Column::Id);
        if let TenantScope::Tenant(tenant_id) = scope {
            query = query.filter(users::Column::TenantId.eq(tenant_id));
        }
        query
            .all(&self.db)
            .await
            .map_err(|e| CoreError::from_db("list users", e))
    }

    async fn create<C: ConnectionTrait>(&self, conn: &C, payload: UserPayload) -> CoreResult<users::Model> {
        let user_name = match payload.user_name.as_deref() {
            Some(user_name) => require_non_blank("userName", user_name)?,
            None => return Err(CoreError::validation("userName is required")),
        };
        let tenant_id = payload.tenant_id.into_initial();
        if let Some(tenant_id) = tenant_id {
            tenant_service::find_by_id(conn, tenant_id).await?;
        }

        let new_user = NewUser {
            display_name: payload.display_name.unwrap_or_else(|| user_name.clone()),
            user_name,
            email: payload.email.into_initial(),
            roles: payload.roles.unwrap_or_default(),
            tenant_id,
            is_active: payload.is_active.unwrap_or(true),
        };

        let outcome = match payload.password.as_deref() {
            Some(password) => {
                self.user_manager
                    .create_with_password(conn, new_user, password)
                    .await?
            }
            None => self.user_manager.create(conn, new_user).await?,
        };
        outcome.map_err(IdentityResult::into_error)
    }

    async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
        payload: UserPayload,
    ) -> CoreResult<users::Model> {
        let existing = find_by_id(conn, id).await?;

        // Nothing is written until the new password passes every validator.
        let password = payload.password.clone();
        if let Some(password) = password.as_deref() {
            self.user_manager
                .validate_password(Some(&existing), password)
                .into_result()?;
        }

        if let Patch::Set(tenant_id) = payload.tenant_id {
            tenant_service::find_by_id(conn, tenant_id).await?;
        }

        let user = apply_updates(existing, payload)?;
        let mut user = self
            .user_manager
            .update(conn, user)
            .await?
            .map_err(IdentityResult::into_error)?;

        if let Some(password) = password.as_deref() {
            debug!(user_id = user.id, "Replacing user credential");
            user = self
                .user_manager
                .remove_password(conn, user)
                .await?
                .map_err(IdentityResult::into_error)?;
            user = self
                .user_manager
                .add_password(conn, user, password)
                .await?
                .map_err(IdentityResult::into_error)?;
        }

        Ok(user)
    }
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> CoreResult<users::Model> {
    users::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| CoreError::from_db("find user", e))?
        .ok_or_else(|| CoreError::not_found("User", id.to_string()))
}

/// Copy supplied fields onto `existing`. The id and credential are never touched.
pub fn apply_updates(existing: users::Model, payload: UserPayload) -> CoreResult<users::Model> {
    let mut user = existing;
    if let Some(user_name) = payload.user_name.as_deref() {
        user.user_name = require_non_blank("userName", user_name)?;
    }
    if let Some(email) = payload.email.into_update() {
        user.email = email;
    }
    if let Some(display_name) = payload.display_name {
        user.display_name = display_name;
    }
    if let Some(roles) = payload.roles {
        user.roles = users::encode_roles(&roles)?;
    }
    if let Some(tenant_id) = payload.tenant_id.into_update() {
        user.tenant_id = tenant_id;
    }
    if let Some(is_active) = payload.is_active {
        user.is_active = is_active;
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: 7,
            user_name: "ada".to_string(),
            email: Some("ada@example.com".to_string()),
            display_name: "Ada".to_string(),
            password_hash: Some("hash".to_string()),
            roles: r#"["Editor"]"#.to_string(),
            tenant_id: Some(3),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn partial_update_keeps_absent_fields() {
        let updated = apply_updates(
            existing(),
            UserPayload {
                display_name: Some("New Name".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.id, 7);
        assert_eq!(updated.display_name, "New Name");
        assert_eq!(updated.user_name, "ada");
        assert_eq!(updated.email.as_deref(), Some("ada@example.com"));
        assert_eq!(updated.role_names(), vec!["Editor".to_string()]);
        assert_eq!(updated.password_hash.as_deref(), Some("hash"));
    }

    #[test]
    fn null_email_clears_it() {
        let updated = apply_updates(
            existing(),
            UserPayload {
                email: Patch::Clear,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.email, None);
    }

    #[test]
    fn privileged_fields_detected() {
        assert!(!UserPayload::default().has_privileged_fields());
        assert!(UserPayload {
            roles: Some(vec![]),
            ..Default::default()
        }
        .has_privileged_fields());
        assert!(UserPayload {
            tenant_id: Patch::Clear,
            ..Default::default()
        }
        .has_privileged_fields());
        assert!(UserPayload {
            is_active: Some(false),
            ..Default::default()
        }
        .has_privileged_fields());
    }
}
