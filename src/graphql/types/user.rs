use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::users;
use crate::errors::CoreResult;
use crate::services::{Change, UserPayload};

#[derive(SimpleObject)]
pub struct User {
    pub id: i32,
    #[graphql(name = "userName")]
    pub user_name: String,
    pub email: Option<String>,
    #[graphql(name = "displayName")]
    pub display_name: String,
    pub roles: Vec<String>,
    #[graphql(name = "tenantId")]
    pub tenant_id: Option<i32>,
    #[graphql(name = "isActive")]
    pub is_active: bool,
    #[graphql(name = "hasPassword")]
    pub has_password: bool,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        let roles = model.role_names();
        let has_password = model.has_password();
        Self {
            id: model.id,
            user_name: model.user_name,
            email: model.email,
            display_name: model.display_name,
            roles,
            tenant_id: model.tenant_id,
            is_active: model.is_active,
            has_password,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Every field is optional; `editUser` only touches what is supplied.
#[derive(InputObject)]
pub struct UserInput {
    pub id: Option<i32>,
    #[graphql(name = "userName")]
    pub user_name: Option<String>,
    pub email: MaybeUndefined<String>,
    #[graphql(name = "displayName")]
    pub display_name: Option<String>,
    #[graphql(secret)]
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
    #[graphql(name = "tenantId")]
    pub tenant_id: MaybeUndefined<i32>,
    #[graphql(name = "isActive")]
    pub is_active: Option<bool>,
}

impl UserInput {
    fn into_payload(self) -> (Option<i32>, UserPayload) {
        (
            self.id,
            UserPayload {
                user_name: self.user_name,
                email: self.email.into(),
                display_name: self.display_name,
                // An empty password means no password.
                password: self.password.filter(|password| !password.is_empty()),
                roles: self.roles,
                tenant_id: self.tenant_id.into(),
                is_active: self.is_active,
            },
        )
    }

    pub fn into_create(self) -> Change<UserPayload> {
        let (_, payload) = self.into_payload();
        Change::create(payload)
    }

    pub fn into_update(self) -> CoreResult<Change<UserPayload>> {
        let (id, payload) = self.into_payload();
        Change::update("User", id, payload)
    }
}
