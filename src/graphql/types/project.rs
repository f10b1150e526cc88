use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::projects;
use crate::errors::CoreResult;
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::Task;
use crate::services::{Change, ProjectPayload};

#[derive(SimpleObject)]
#[graphql(complex)]
pub struct Project {
    pub id: i32,
    #[graphql(name = "tenantId")]
    pub tenant_id: i32,
    pub name: String,
    pub description: Option<String>,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<projects::Model> for Project {
    fn from(model: projects::Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[ComplexObject]
impl Project {
    async fn tasks(&self, ctx: &Context<'_>) -> Result<Vec<Task>> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let tasks = context
            .task_service
            .list(&caller, Some(self.id))
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(tasks.into_iter().map(Task::from).collect())
    }
}

/// `tenantId` is accepted for compatibility and ignored; the tenant always
/// comes from the caller.
#[derive(InputObject)]
pub struct ProjectInput {
    pub id: Option<i32>,
    #[graphql(name = "tenantId")]
    pub tenant_id: Option<i32>,
    pub name: String,
    pub description: MaybeUndefined<String>,
}

impl ProjectInput {
    fn into_payload(self) -> (Option<i32>, ProjectPayload) {
        (
            self.id,
            ProjectPayload {
                name: self.name,
                description: self.description.into(),
            },
        )
    }

    pub fn into_create(self) -> Change<ProjectPayload> {
        let (_, payload) = self.into_payload();
        Change::create(payload)
    }

    pub fn into_update(self) -> CoreResult<Change<ProjectPayload>> {
        let (id, payload) = self.into_payload();
        Change::update("Project", id, payload)
    }
}
