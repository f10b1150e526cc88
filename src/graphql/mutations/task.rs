use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{Task, TaskInput};

#[derive(Default)]
pub struct TaskMutation;

#[Object]
impl TaskMutation {
    /// Create a task in the caller's tenant
    async fn add_task(&self, ctx: &Context<'_>, task: TaskInput) -> Result<Task> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let task = context
            .task_service
            .save(&caller, task.into_create())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Task::from(task))
    }

    async fn edit_task(&self, ctx: &Context<'_>, task: TaskInput) -> Result<Task> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let change = task.into_update().map_err(core_error_to_graphql_error)?;
        let task = context
            .task_service
            .save(&caller, change)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Task::from(task))
    }
}
