use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{Project, Task, Tenant, User};

/// Read side, scoped to what the caller may see
#[derive(Default)]
pub struct Query;

#[Object]
impl Query {
    /// The user making the request
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let user = context
            .user_service
            .me(&caller)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(User::from(user))
    }

    async fn tenant(&self, ctx: &Context<'_>, id: i32) -> Result<Tenant> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let tenant = context
            .tenant_service
            .get(&caller, id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Tenant::from(tenant))
    }

    async fn tenants(&self, ctx: &Context<'_>) -> Result<Vec<Tenant>> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let tenants = context
            .tenant_service
            .list(&caller)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(tenants.into_iter().map(Tenant::from).collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: i32) -> Result<User> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let user = context
            .user_service
            .get(&caller, id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(User::from(user))
    }

    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let users = context
            .user_service
            .list(&caller)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn project(&self, ctx: &Context<'_>, id: i32) -> Result<Project> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let project = context
            .project_service
            .get(&caller, id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Project::from(project))
    }

    async fn projects(&self, ctx: &Context<'_>) -> Result<Vec<Project>> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let projects = context
            .project_service
            .list(&caller)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(projects.into_iter().map(Project::from).collect())
    }

    async fn task(&self, ctx: &Context<'_>, id: i32) -> Result<Task> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let task = context
            .task_service
            .get(&caller, id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Task::from(task))
    }

    async fn tasks(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "projectId")] project_id: Option<i32>,
    ) -> Result<Vec<Task>> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let tasks = context
            .task_service
            .list(&caller, project_id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(tasks.into_iter().map(Task::from).collect())
    }
}
