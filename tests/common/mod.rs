#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{Request, Response, ServerError, Value};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

use taskhub::auth::Caller;
use taskhub::config::AppConfig;
use taskhub::database::entities::{projects, tasks, tenants, users};
use taskhub::database::test_utils::setup_test_db;
use taskhub::graphql::{build_schema, GraphQLContext, GraphQLSchema};
use taskhub::services::{NewUser, UserManager};

pub const STRONG_PASSWORD: &str = "Passw0rd!";

pub struct TestApp {
    pub db: DatabaseConnection,
    pub schema: GraphQLSchema,
    pub user_manager: Arc<UserManager>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = setup_test_db().await.expect("test database");
        let config = AppConfig {
            bcrypt_cost: 4,
            ..AppConfig::default()
        };
        let user_manager = Arc::new(UserManager::new(&config));
        let schema = build_schema(GraphQLContext::new(db.clone(), user_manager.clone()));

        Self {
            db,
            schema,
            user_manager,
        }
    }

    pub async fn execute(&self, caller: Caller, query: &str) -> Response {
        self.schema.execute(Request::new(query).data(caller)).await
    }

    pub async fn execute_anonymous(&self, query: &str) -> Response {
        self.schema.execute(Request::new(query)).await
    }

    pub async fn tenant(&self, name: &str) -> tenants::Model {
        let mut tenant = tenants::ActiveModel::new();
        tenant.name = Set(name.to_string());
        tenant.insert(&self.db).await.expect("insert tenant")
    }

    pub async fn user(
        &self,
        user_name: &str,
        tenant_id: Option<i32>,
        password: Option<&str>,
    ) -> users::Model {
        let new_user = NewUser {
            user_name: user_name.to_string(),
            email: Some(format!("{}@example.com", user_name)),
            display_name: user_name.to_string(),
            roles: vec!["Member".to_string()],
            tenant_id,
            is_active: true,
        };
        let outcome = match password {
            Some(password) => self
                .user_manager
                .create_with_password(&self.db, new_user, password)
                .await,
            None => self.user_manager.create(&self.db, new_user).await,
        };
        outcome.expect("create user").expect("identity result")
    }

    pub async fn project(&self, tenant_id: i32, name: &str) -> projects::Model {
        let mut project = projects::ActiveModel::new();
        project.tenant_id = Set(tenant_id);
        project.name = Set(name.to_string());
        project.insert(&self.db).await.expect("insert project")
    }

    pub async fn task(&self, tenant_id: i32, title: &str) -> tasks::Model {
        let mut task = tasks::ActiveModel::new();
        task.tenant_id = Set(tenant_id);
        task.title = Set(title.to_string());
        task.insert(&self.db).await.expect("insert task")
    }

    pub async fn count_tenants(&self) -> u64 {
        tenants::Entity::find().count(&self.db).await.unwrap()
    }

    pub async fn count_users(&self) -> u64 {
        users::Entity::find().count(&self.db).await.unwrap()
    }

    pub async fn count_projects(&self) -> u64 {
        projects::Entity::find().count(&self.db).await.unwrap()
    }

    pub async fn count_tasks(&self) -> u64 {
        tasks::Entity::find().count(&self.db).await.unwrap()
    }

    pub async fn reload_user(&self, id: i32) -> users::Model {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .unwrap()
            .expect("user exists")
    }
}

pub fn admin() -> Caller {
    Caller::host_administrator(1)
}

pub fn member(user_id: i32, tenant_id: i32) -> Caller {
    Caller::user(user_id).with_tenant(tenant_id)
}

pub fn data(response: &Response) -> serde_json::Value {
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.clone().into_json().unwrap()
}

pub fn first_error(response: &Response) -> &ServerError {
    response
        .errors
        .first()
        .unwrap_or_else(|| panic!("expected an error, got {:?}", response.data))
}

pub fn extension_value<'a>(error: &'a ServerError, key: &str) -> Option<&'a Value> {
    error.extensions.as_ref().and_then(|ext| ext.get(key))
}

pub fn assert_code(response: &Response, code: &str) -> ServerError {
    let error = first_error(response);
    assert_eq!(
        extension_value(error, "code"),
        Some(&Value::from(code)),
        "unexpected error: {}",
        error.message
    );
    error.clone()
}
