use std::sync::Arc;

use async_graphql::Context;
use sea_orm::DatabaseConnection;

use crate::auth::Caller;
use crate::services::{
    Authorizer, PolicyAuthorizer, ProjectService, TaskService, TenantService, UserManager,
    UserService,
};

#[derive(Clone)]
pub struct GraphQLContext {
    pub db: DatabaseConnection,
    pub user_manager: Arc<UserManager>,
    pub authorizer: Arc<dyn Authorizer>,
    pub tenant_service: Arc<TenantService>,
    pub user_service: Arc<UserService>,
    pub project_service: Arc<ProjectService>,
    pub task_service: Arc<TaskService>,
}

impl GraphQLContext {
    pub fn new(db: DatabaseConnection, user_manager: Arc<UserManager>) -> Self {
        Self::with_authorizer(db, user_manager, Arc::new(PolicyAuthorizer))
    }

    pub fn with_authorizer(
        db: DatabaseConnection,
        user_manager: Arc<UserManager>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        let tenant_service = Arc::new(TenantService::new(db.clone(), authorizer.clone()));
        let user_service = Arc::new(UserService::new(
            db.clone(),
            authorizer.clone(),
            user_manager.clone(),
        ));
        let project_service = Arc::new(ProjectService::new(db.clone(), authorizer.clone()));
        let task_service = Arc::new(TaskService::new(db.clone(), authorizer.clone()));

        Self {
            db,
            user_manager,
            authorizer,
            tenant_service,
            user_service,
            project_service,
            task_service,
        }
    }

    /// The caller attached to this request by the hosting layer, or an anonymous one.
    pub fn caller_for_request(&self, ctx: &Context<'_>) -> Caller {
        ctx.data_opt::<Caller>()
            .cloned()
            .unwrap_or_else(Caller::anonymous)
    }
}
