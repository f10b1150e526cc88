use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::tasks;
use crate::errors::CoreResult;
use crate::services::{Change, TaskPayload};

#[derive(SimpleObject)]
pub struct Task {
    pub id: i32,
    #[graphql(name = "tenantId")]
    pub tenant_id: i32,
    #[graphql(name = "projectId")]
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    #[graphql(name = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    #[graphql(name = "completionDate")]
    pub completion_date: Option<DateTime<Utc>>,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<tasks::Model> for Task {
    fn from(model: tasks::Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            project_id: model.project_id,
            title: model.title,
            description: model.description,
            due_date: model.due_date,
            completed: model.completed,
            completion_date: model.completion_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(InputObject)]
pub struct TaskInput {
    pub id: Option<i32>,
    /// Ignored; tasks are always created in the caller's tenant.
    #[graphql(name = "tenantId")]
    pub tenant_id: Option<i32>,
    #[graphql(name = "projectId")]
    pub project_id: MaybeUndefined<i32>,
    pub title: String,
    pub description: MaybeUndefined<String>,
    #[graphql(name = "dueDate")]
    pub due_date: MaybeUndefined<DateTime<Utc>>,
    pub completed: Option<bool>,
    #[graphql(name = "completionDate")]
    pub completion_date: MaybeUndefined<DateTime<Utc>>,
}

impl TaskInput {
    fn into_payload(self) -> (Option<i32>, TaskPayload) {
        (
            self.id,
            TaskPayload {
                title: self.title,
                description: self.description.into(),
                project_id: self.project_id.into(),
                due_date: self.due_date.into(),
                completed: self.completed,
                completion_date: self.completion_date.into(),
            },
        )
    }

    pub fn into_create(self) -> Change<TaskPayload> {
        let (_, payload) = self.into_payload();
        Change::create(payload)
    }

    pub fn into_update(self) -> CoreResult<Change<TaskPayload>> {
        let (id, payload) = self.into_payload();
        Change::update("Task", id, payload)
    }
}
