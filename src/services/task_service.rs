use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::auth::Caller;
use crate::database::entities::tasks;
use crate::errors::{CoreError, CoreResult};
use crate::services::authorization::{require_tenant, Authorizer, MutationKind, TenantScope};
use crate::services::change::{require_non_blank, Change, Patch};
use crate::services::project_service;
use crate::services::unit_of_work;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskPayload {
    pub title: String,
    pub description: Patch<String>,
    pub project_id: Patch<i32>,
    pub due_date: Patch<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub completion_date: Patch<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct TaskService {
    db: DatabaseConnection,
    authorizer: Arc<dyn Authorizer>,
}

impl TaskService {
    pub fn new(db: DatabaseConnection, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { db, authorizer }
    }

    /// Create a task in the caller's tenant, or overwrite one visible to the caller.
    pub async fn save(&self, caller: &Caller, change: Change<TaskPayload>) -> CoreResult<tasks::Model> {
        let mutation = match change {
            Change::Create(_) => MutationKind::AddTask,
            Change::Update { .. } => MutationKind::EditTask,
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
        let task = unit_of_work::finish(txn, outcome).await?;

        info!(
            operation = %mutation,
            task_id = task.id,
            tenant_id = task.tenant_id,
            project_id = ?task.project_id,
            caller_id = ?caller.user_id,
            "Task saved"
        );
        Ok(task)
    }

    pub async fn get(&self, caller: &Caller, id: i32) -> CoreResult<tasks::Model> {
        let scope = TenantScope::for_caller(caller)?;
        find_in_scope(&self.db, scope, id).await
    }

    /// Tasks visible to the caller, optionally narrowed to one project.
    pub async fn list(
        &self,
        caller: &Caller,
        project_id: Option<i32>,
    ) -> CoreResult<Vec<tasks::Model>> {
        let scope = TenantScope::for_caller(caller)?;
        let mut query = tasks::Entity::find().order_by_asc(tasks::Column::Id);
        if let TenantScope::Tenant(tenant_id) = scope {
            query = query.filter(tasks::Column::TenantId.eq(tenant_id));
        }
        if let Some(project_id) = project_id {
            query = query.filter(tasks::Column::ProjectId.eq(project_id));
        }
        query
            .all(&self.db)
            .await
            .map_err(|e| CoreError::from_db("list tasks", e))
    }
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> CoreResult<tasks::Model> {
    tasks::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| CoreError::from_db("find task", e))?
        .ok_or_else(|| CoreError::not_found("Task", id.to_string()))
}

pub async fn find_in_scope<C: ConnectionTrait>(
    conn: &C,
    scope: TenantScope,
    id: i32,
) -> CoreResult<tasks::Model> {
    let task = find_by_id(conn, id).await?;
    if !scope.contains(task.tenant_id) {
        return Err(CoreError::not_found("Task", id.to_string()));
    }
    Ok(task)
}

/// Copy payload fields onto `existing`. The tenant is never touched.
pub fn apply_updates(existing: tasks::Model, payload: TaskPayload) -> CoreResult<tasks::ActiveModel> {
    let mut active: tasks::ActiveModel = existing.into();
    active.title = Set(require_non_blank("title", &payload.title)?);
    if let Some(description) = payload.description.into_update() {
        active.description = Set(description);
    }
    if let Some(project_id) = payload.project_id.into_update() {
        active.project_id = Set(project_id);
    }
    if let Some(due_date) = payload.due_date.into_update() {
        active.due_date = Set(due_date);
    }
    if let Some(completed) = payload.completed {
        active.completed = Set(completed);
    }
    if let Some(completion_date) = payload.completion_date.into_update() {
        active.completion_date = Set(completion_date);
    }
    Ok(active.set_updated_at())
}

/// A referenced project must live in the task's tenant.
async fn ensure_project<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    project_id: &Patch<i32>,
) -> CoreResult<()> {
    if let Patch::Set(project_id) = project_id {
        project_service::find_in_scope(conn, TenantScope::Tenant(tenant_id), *project_id).await?;
    }
    Ok(())
}

async fn create<C: ConnectionTrait>(
    conn: &C,
    tenant_id: i32,
    payload: TaskPayload,
) -> CoreResult<tasks::Model> {
    ensure_project(conn, tenant_id, &payload.project_id).await?;

    let mut active = tasks::ActiveModel::new();
    active.tenant_id = Set(tenant_id);
    active.title = Set(require_non_blank("title", &payload.title)?);
    active.description = Set(payload.description.into_initial());
    active.project_id = Set(payload.project_id.into_initial());
    active.due_date = Set(payload.due_date.into_initial());
    active.completed = Set(payload.completed.unwrap_or(false));
    active.completion_date = Set(payload.completion_date.into_initial());

    active
        .insert(conn)
        .await
        .map_err(|e| CoreError::from_db("insert task", e))
}

async fn update<C: ConnectionTrait>(
    conn: &C,
    scope: TenantScope,
    id: i32,
    payload: TaskPayload,
) -> CoreResult<tasks::Model> {
    let existing = find_in_scope(conn, scope, id).await?;
    ensure_project(conn, existing.tenant_id, &payload.project_id).await?;
    apply_updates(existing, payload)?
        .update(conn)
        .await
        .map_err(|e| CoreError::from_db(&format!("update task {}", id), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn existing() -> tasks::Model {
        let now = Utc::now();
        tasks::Model {
            id: 11,
            tenant_id: 3,
            project_id: Some(5),
            title: "Write report".to_string(),
            description: Some("quarterly".to_string()),
            due_date: None,
            completed: false,
            completion_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn apply_updates_keeps_identity_fields() {
        let active = apply_updates(
            existing(),
            TaskPayload {
                title: "Ship report".to_string(),
                completed: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(active.id, ActiveValue::Unchanged(11));
        assert_eq!(active.tenant_id, ActiveValue::Unchanged(3));
        assert_eq!(active.project_id, ActiveValue::Unchanged(Some(5)));
        assert_eq!(
            active.description,
            ActiveValue::Unchanged(Some("quarterly".to_string()))
        );
        assert_eq!(active.title, ActiveValue::Set("Ship report".to_string()));
        assert_eq!(active.completed, ActiveValue::Set(true));
    }

    #[test]
    fn apply_updates_clears_nullable_fields() {
        let active = apply_updates(
            existing(),
            TaskPayload {
                title: "Write report".to_string(),
                description: Patch::Clear,
                project_id: Patch::Clear,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(active.description, ActiveValue::Set(None));
        assert_eq!(active.project_id, ActiveValue::Set(None));
    }

    #[test]
    fn apply_updates_rejects_blank_title() {
        let err = apply_updates(
            existing(),
            TaskPayload {
                title: "  ".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::errors::CoreErrorKind::Validation);
    }
}
