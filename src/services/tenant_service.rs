use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use tracing::info;

use crate::auth::Caller;
use crate::database::entities::tenants;
use crate::errors::{CoreError, CoreResult};
use crate::services::authorization::{Authorizer, MutationKind, TenantScope};
use crate::services::change::{require_non_blank, Change};
use crate::services::unit_of_work;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TenantPayload {
    pub name: String,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct TenantService {
    db: DatabaseConnection,
    authorizer: Arc<dyn Authorizer>,
}

impl TenantService {
    pub fn new(db: DatabaseConnection, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { db, authorizer }
    }

    /// Insert or overwrite a tenant. Administrators only.
    pub async fn save(
        &self,
        caller: &Caller,
        change: Change<TenantPayload>,
    ) -> CoreResult<tenants::Model> {
        let mutation = match change {
            Change::Create(_) => MutationKind::AddTenant,
            Change::Update { .. } => MutationKind::EditTenant,
        };
        self.authorizer.authorize(caller, mutation, change.id())?;

        let txn = unit_of_work::begin(&self.db).await?;
        let outcome = match change {
            Change::Create(payload) => create(&txn, payload).await,
            Change::Update { id, payload } => update(&txn, id, payload).await,
        };
        let tenant = unit_of_work::finish(txn, outcome).await?;

        info!(
            operation = %mutation,
            tenant_id = tenant.id,
            caller_id = ?caller.user_id,
            "Tenant saved"
        );
        Ok(tenant)
    }

    pub async fn get(&self, caller: &Caller, id: i32) -> CoreResult<tenants::Model> {
        let scope = TenantScope::for_caller(caller)?;
        if !scope.contains(id) {
            return Err(CoreError::not_found("Tenant", id.to_string()));
        }
        find_by_id(&self.db, id).await
    }

    pub async fn list(&self, caller: &Caller) -> CoreResult<Vec<tenants::Model>> {
        let scope = TenantScope::for_caller(caller)?;
        let tenants = tenants::Entity::find()
            .order_by_asc(tenants::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::from_db("list tenants", e))?;
        Ok(tenants
            .into_iter()
            .filter(|tenant| scope.contains(tenant.id))
            .collect())
    }
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> CoreResult<tenants::Model> {
    tenants::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| CoreError::from_db("find tenant", e))?
        .ok_or_else(|| CoreError::not_found("Tenant", id.to_string()))
}

pub fn apply_updates(
    existing: tenants::Model,
    payload: TenantPayload,
) -> CoreResult<tenants::ActiveModel> {
    let mut active: tenants::ActiveModel = existing.into();
    active.name = Set(require_non_blank("name", &payload.name)?);
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    Ok(active.set_updated_at())
}

async fn create<C: ConnectionTrait>(conn: &C, payload: TenantPayload) -> CoreResult<tenants::Model> {
    let mut active = tenants::ActiveModel::new();
    active.name = Set(require_non_blank("name", &payload.name)?);
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    active
        .insert(conn)
        .await
        .map_err(|e| CoreError::from_db("insert tenant", e))
}

async fn update<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    payload: TenantPayload,
) -> CoreResult<tenants::Model> {
    let existing = find_by_id(conn, id).await?;
    apply_updates(existing, payload)?
        .update(conn)
        .await
        .map_err(|e| CoreError::from_db(&format!("update tenant {}", id), e))
}
