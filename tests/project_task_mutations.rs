#![cfg(feature = "graphql")]

mod common;

use async_graphql::Value;
use taskhub::auth::Caller;

use common::{admin, assert_code, data, extension_value, member, TestApp};

#[tokio::test]
async fn add_project_uses_caller_tenant() {
    let app = TestApp::new().await;
    let own = app.tenant("Acme").await;
    let other = app.tenant("Globex").await;

    let response = app
        .execute(
            member(7, own.id),
            &format!(
                r#"mutation {{ addProject(project: {{ name: "Roadmap", tenantId: {}, description: "Q3" }}) {{ id tenantId name description }} }}"#,
                other.id
            ),
        )
        .await;
    let json = data(&response);

    assert!(json["addProject"]["id"].as_i64().unwrap() > 0);
    assert_eq!(json["addProject"]["tenantId"].as_i64(), Some(own.id as i64));
    assert_eq!(json["addProject"]["description"], "Q3");
}

#[tokio::test]
async fn add_task_ignores_client_tenant() {
    let app = TestApp::new().await;
    let tenant = app.tenant("Acme").await;

    let response = app
        .execute(
            member(7, tenant.id),
            r#"mutation { addTask(task: { title: "T", tenantId: 999 }) { id tenantId title completed projectId } }"#,
        )
        .await;
    let json = data(&response);

    assert_eq!(json["addTask"]["tenantId"].as_i64(), Some(tenant.id as i64));
    assert_eq!(json["addTask"]["title"], "T");
    assert_eq!(json["addTask"]["completed"], false);
    assert_eq!(json["addTask"]["projectId"], serde_json::Value::Null);
}

#[tokio::test]
async fn callers_without_tenant_cannot_create_tenant_data() {
    let app = TestApp::new().await;

    for caller in [Caller::anonymous(), Caller::user(7), admin()] {
        let response = app
            .execute(
                caller.clone(),
                r#"mutation { addProject(project: { name: "Roadmap" }) { id } }"#,
            )
            .await;
        assert_code(&response, "FORBIDDEN");

        let response = app
            .execute(caller, r#"mutation { addTask(task: { title: "T" }) { id } }"#)
            .await;
        assert_code(&response, "FORBIDDEN");
    }

    assert_eq!(app.count_projects().await, 0);
    assert_eq!(app.count_tasks().await, 0);
}

#[tokio::test]
async fn add_project_for_unknown_tenant_is_database_error() {
    let app = TestApp::new().await;

    let response = app
        .execute(
            member(7, 999),
            r#"mutation { addProject(project: { name: "Roadmap" }) { id } }"#,
        )
        .await;
    let error = assert_code(&response, "DATABASE_ERROR");
    assert!(error.message.contains("foreign key"), "{}", error.message);
    assert_eq!(app.count_projects().await, 0);
}

#[tokio::test]
async fn edit_project_keeps_tenant_and_clears_description() {
    let app = TestApp::new().await;
    let tenant = app.tenant("Acme").await;
    let other = app.tenant("Globex").await;
    let project = app.project(tenant.id, "Roadmap").await;

    let response = app
        .execute(
            member(7, tenant.id),
            &format!(
                r#"mutation {{ editProject(project: {{ id: {}, tenantId: {}, name: "Roadmap 2", description: null }}) {{ id tenantId name description }} }}"#,
                project.id, other.id
            ),
        )
        .await;
    let json = data(&response);

    assert_eq!(json["editProject"]["id"].as_i64(), Some(project.id as i64));
    assert_eq!(json["editProject"]["tenantId"].as_i64(), Some(tenant.id as i64));
    assert_eq!(json["editProject"]["name"], "Roadmap 2");
    assert_eq!(json["editProject"]["description"], serde_json::Value::Null);
}

#[tokio::test]
async fn edit_project_in_other_tenant_is_not_found() {
    let app = TestApp::new().await;
    let tenant = app.tenant("Acme").await;
    let other = app.tenant("Globex").await;
    let project = app.project(other.id, "Secret").await;

    let response = app
        .execute(
            member(7, tenant.id),
            &format!(
                r#"mutation {{ editProject(project: {{ id: {}, name: "Stolen" }}) {{ id }} }}"#,
                project.id
            ),
        )
        .await;
    assert_code(&response, "NOT_FOUND");

    let response = app
        .execute(
            admin(),
            &format!(
                r#"mutation {{ editProject(project: {{ id: {}, name: "Declassified" }}) {{ name tenantId }} }}"#,
                project.id
            ),
        )
        .await;
    let json = data(&response);
    assert_eq!(json["editProject"]["name"], "Declassified");
    assert_eq!(json["editProject"]["tenantId"].as_i64(), Some(other.id as i64));
}

#[tokio::test]
async fn edit_missing_project_and_task_are_not_found() {
    let app = TestApp::new().await;
    let tenant = app.tenant("Acme").await;

    let response = app
        .execute(
            member(7, tenant.id),
            r#"mutation { editProject(project: { id: 41, name: "Ghost" }) { id } }"#,
        )
        .await;
    let error = assert_code(&response, "NOT_FOUND");
    assert_eq!(extension_value(&error, "entity"), Some(&Value::from("Project")));
    assert_eq!(extension_value(&error, "id"), Some(&Value::from("41")));

    let response = app
        .execute(
            member(7, tenant.id),
            r#"mutation { editTask(task: { id: 42, title: "Ghost" }) { id } }"#,
        )
        .await;
    let error = assert_code(&response, "NOT_FOUND");
    assert_eq!(extension_value(&error, "entity"), Some(&Value::from("Task")));

    assert_eq!(app.count_projects().await, 0);
    assert_eq!(app.count_tasks().await, 0);
}

#[tokio::test]
async fn edit_task_overwrites_fields() {
    let app = TestApp::new().await;
    let tenant = app.tenant("Acme").await;
    let project = app.project(tenant.id, "Roadmap").await;
    let task = app.task(tenant.id, "Draft").await;

    let response = app
        .execute(
            member(7, tenant.id),
            &format!(
                r#"mutation {{ editTask(task: {{ id: {}, title: "Final", projectId: {}, completed: true, completionDate: "2026-03-01T12:00:00Z", dueDate: "2026-03-02T00:00:00Z" }}) {{ id tenantId projectId title completed completionDate dueDate }} }}"#,
                task.id, project.id
            ),
        )
        .await;
    let json = data(&response);

    assert_eq!(json["editTask"]["tenantId"].as_i64(), Some(tenant.id as i64));
    assert_eq!(json["editTask"]["projectId"].as_i64(), Some(project.id as i64));
    assert_eq!(json["editTask"]["title"], "Final");
    assert_eq!(json["editTask"]["completed"], true);
    assert!(json["editTask"]["completionDate"]
        .as_str()
        .unwrap()
        .starts_with("2026-03-01T12:00:00"));
    assert!(!json["editTask"]["dueDate"].is_null());
}

#[tokio::test]
async fn task_cannot_reference_foreign_project() {
    let app = TestApp::new().await;
    let tenant = app.tenant("Acme").await;
    let other = app.tenant("Globex").await;
    let foreign = app.project(other.id, "Secret").await;

    let response = app
        .execute(
            member(7, tenant.id),
            &format!(
                r#"mutation {{ addTask(task: {{ title: "T", projectId: {} }}) {{ id }} }}"#,
                foreign.id
            ),
        )
        .await;
    let error = assert_code(&response, "NOT_FOUND");
    assert_eq!(extension_value(&error, "entity"), Some(&Value::from("Project")));
    assert_eq!(app.count_tasks().await, 0);
}

#[tokio::test]
async fn blank_titles_are_rejected() {
    let app = TestApp::new().await;
    let tenant = app.tenant("Acme").await;

    let response = app
        .execute(
            member(7, tenant.id),
            r#"mutation { addTask(task: { title: "" }) { id } }"#,
        )
        .await;
    assert_code(&response, "VALIDATION_FAILED");

    let response = app
        .execute(
            member(7, tenant.id),
            r#"mutation { addProject(project: { name: "  " }) { id } }"#,
        )
        .await;
    assert_code(&response, "VALIDATION_FAILED");

    assert_eq!(app.count_tasks().await, 0);
    assert_eq!(app.count_projects().await, 0);
}
