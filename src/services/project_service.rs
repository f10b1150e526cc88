use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::auth::Caller;
use crate::database::entities::projects;
use crate::errors::{CoreError, CoreResult};
use crate::services::authorization::{require_tenant, Authorizer, MutationKind, TenantScope};
use crate::services::change::{require_non_blank, Change, Patch};
use crate::services::unit_of_work;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectPayload {
    pub name: String,
    pub description: Patch<String>,
}

#[derive(Clone)]
pub struct ProjectService {
    db: DatabaseConnection,
    authorizer: Arc<dyn Authorizer>,
}

impl ProjectService {
    pub fn new(db: DatabaseConnection, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { db, authorizer }
    }

    /// Create a project in the caller's tenant, or overwrite one visible to the caller.
    pub async fn save(
        &self,
        caller: &Caller,
        change: Change<ProjectPayload>,
    ) -> CoreResult<projects::Model> {
        let mutation = match change {
            Change::Create(_) => MutationKind::AddProject,
            Change::Update { .. } => MutationKind::EditProject,
        };
        self.authorizer.authorize(caller, mutation, change.id())?;

        let txn = unit_of_work::begin(&self.db).await?;
        let outcome = match change {
            Change::Create(payload) => match require_tenant(caller) {
                Ok(tenant_id) => create(&txn, tenant_id, payload).await,
                Err(err) => Err(err),
            },
            Change::Update { id, payload } => match TenantScope::for_caller(caller) {
                Ok(scope) => update(&txn, scope, id, payload).await,
                Err(err) => Err(err),
            },
        };
        let project = unit_of_work::finish(txn, outcome).await?;

        info!(
            operation = %mutation,
            project_id = project.id,
            tenant_id = project.tenant_id,
            caller_id = ?caller.user_id,
            "Project saved"
        );
        Ok(project)
    }

    pub async fn get(&self, caller: &Caller, id: i32) -> CoreResult<projects::Model> {
        let scope = TenantScope::for_caller(caller)?;
        find_in_scope(&self.db, scope, id).await
    }

    pub async fn list(&self, caller: &Caller) -> CoreResult<Vec<projects::Model>> {
        let scope = TenantScope::for_caller(caller)?;
        let mut query = projects::Entity::find().order_by_asc(projects::Column::Id);
        if let TenantScope::Tenant(tenant_id) = scope {
            query = query.filter(projects::Column::TenantId.eq(tenant_id));
        }
        query
            .all(&self.db)
            .await
            .map_err(|e| CoreError::from_db("list projects", e))
    }
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> CoreResult<projects::Model> {
    projects::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| CoreError::from_db("find project", e))?
        .ok_or_else(|| CoreError::not_found("Project", id.to_string()))
}

/// Look up a project, reporting rows outside `scope` as missing.
pub async fn find_in_scope<C: ConnectionTrait>(
    conn: &C,
    scope: TenantScope,
    id: i32,
) -> CoreResult<projects::Model> {
    let project = find_by_id(conn, id).await?;
    if !scope.contains(project.tenant_id) {
        return Err(CoreError::not_found("Project", id.to_string()));
    }
    Ok(project)
}

/// Copy payload fields onto `existing`. The tenant is never touched.
pub fn apply_updates(
    existing: projects::Model,
    payload: ProjectPayload,
) -> CoreResult<projects::ActiveModel> {
    let mut active: projects::ActiveModel = existing.into();
    active.name = Set(require_non_blank("name", &payload.name)?);
    if let Some(description) = payload.description.into_update() {
        active.description = Set(description);
    }
    Ok(active.set_updated_at())
}

async fn create<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    payload: ProjectPayload,
) -> CoreResult<projects::Model> {
    let mut active = projects::ActiveModel::new();
    active.tenant_id = Set(tenant_id);
    active.name = Set(require_non_blank("name", &payload.name)?);
    active.description = Set(payload.description.into_initial());

    active
        .insert(conn)
        .await
        .map_err(|e| CoreError::from_db("insert project", e))
}

async fn update<C: ConnectionTrait>(
    conn: &C,
    scope: TenantScope,
    id: i32,
    payload: ProjectPayload,
) -> CoreResult<projects::Model> {
    let existing = find_in_scope(conn, scope, id).await?;
    apply_updates(existing, payload)?
        .update(conn)
        .await
        .map_err(|e| CoreError::from_db(&format!("update project {}", id), e))
}
