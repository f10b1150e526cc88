use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::tenants;
use crate::errors::CoreResult;
use crate::services::{Change, TenantPayload};

#[derive(SimpleObject)]
pub struct Tenant {
    pub id: i32,
    pub name: String,
    #[graphql(name = "isActive")]
    pub is_active: bool,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<tenants::Model> for Tenant {
    fn from(model: tenants::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Shared by `addTenant` and `editTenant`; `id` is only read by the latter.
#[derive(InputObject)]
pub struct TenantInput {
    pub id: Option<i32>,
    pub name: String,
    #[graphql(name = "isActive")]
    pub is_active: Option<bool>,
}

impl TenantInput {
    fn into_payload(self) -> (Option<i32>, TenantPayload) {
        (
            self.id,
            TenantPayload {
                name: self.name,
                is_active: self.is_active,
            },
        )
    }

    pub fn into_create(self) -> Change<TenantPayload> {
        let (_, payload) = self.into_payload();
        Change::create(payload)
    }

    pub fn into_update(self) -> CoreResult<Change<TenantPayload>> {
        let (id, payload) = self.into_payload();
        Change::update("Tenant", id, payload)
    }
}
