use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{Project, ProjectInput};

#[derive(Default)]
pub struct ProjectMutation;

#[Object]
impl ProjectMutation {
    /// Create a project in the caller's tenant
    async fn add_project(&self, ctx: &Context<'_>, project: ProjectInput) -> Result<Project> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let project = context
            .project_service
            .save(&caller, project.into_create())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Project::from(project))
    }

    async fn edit_project(&self, ctx: &Context<'_>, project: ProjectInput) -> Result<Project> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let change = project.into_update().map_err(core_error_to_graphql_error)?;
        let project = context
            .project_service
            .save(&caller, change)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Project::from(project))
    }
}
