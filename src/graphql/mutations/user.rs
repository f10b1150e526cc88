use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{User, UserInput};

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create a user, with a credential when a password is supplied.
    async fn add_user(&self, ctx: &Context<'_>, user: UserInput) -> Result<User> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let user = context
            .user_service
            .save(&caller, user.into_create())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(User::from(user))
    }

    /// Update a user. Non-administrators may only edit their own record.
    async fn edit_user(&self, ctx: &Context<'_>, user: UserInput) -> Result<User> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let change = user.into_update().map_err(core_error_to_graphql_error)?;
        let user = context
            .user_service
            .save(&caller, change)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(User::from(user))
    }
}
