mod project;
mod task;
mod tenant;
mod user;

use async_graphql::*;

/// Mutation root combining the per-entity mutation objects
#[derive(Default, MergedObject)]
pub struct Mutation(
    pub tenant::TenantMutation,
    pub user::UserMutation,
    pub project::ProjectMutation,
    pub task::TaskMutation,
);
