#![cfg(feature = "graphql")]

use async_graphql::{Error, Value};

use taskhub::errors::{CoreError, IdentityError, IdentityErrorCode, IdentityResult};
use taskhub::graphql::errors::core_error_to_graphql_error;

fn extension_value<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
    error.extensions.as_ref().and_then(|ext| ext.get(key))
}

#[test]
fn core_error_maps_to_graphql_codes() {
    let cases = vec![
        (CoreError::validation("invalid"), "VALIDATION_FAILED"),
        (CoreError::forbidden("nope"), "FORBIDDEN"),
        (CoreError::unauthorized("auth"), "UNAUTHORIZED"),
        (CoreError::storage("constraint"), "DATABASE_ERROR"),
        (CoreError::internal("boom"), "INTERNAL_ERROR"),
        (CoreError::identity_unspecified(), "IDENTITY_ERROR"),
    ];

    for (core_error, code) in cases {
        let error = core_error_to_graphql_error(core_error);
        assert_eq!(extension_value(&error, "code"), Some(&Value::from(code)));
    }
}

#[test]
fn not_found_error_includes_fields() {
    let error = core_error_to_graphql_error(CoreError::not_found("Project", "12"));
    assert_eq!(
        extension_value(&error, "code"),
        Some(&Value::from("NOT_FOUND"))
    );
    assert_eq!(
        extension_value(&error, "entity"),
        Some(&Value::from("Project"))
    );
    assert_eq!(extension_value(&error, "id"), Some(&Value::from("12")));
    assert_eq!(error.message, "Project with id '12' not found");
}

#[test]
fn identity_error_keeps_code_and_description() {
    let failed = IdentityResult::failed(vec![
        IdentityError::new(IdentityErrorCode::DuplicateEmail, "Email 'a@b.io' is already taken."),
        IdentityError::new(IdentityErrorCode::InvalidUserName, "ignored"),
    ]);
    let error = core_error_to_graphql_error(failed.into_error());

    assert_eq!(error.message, "DuplicateEmail: Email 'a@b.io' is already taken.");
    assert_eq!(
        extension_value(&error, "identityCode"),
        Some(&Value::from("DuplicateEmail"))
    );

    let fallback = core_error_to_graphql_error(IdentityResult::failed(Vec::new()).into_error());
    assert_eq!(fallback.message, "Identity error");
    assert_eq!(extension_value(&fallback, "identityCode"), None);
}
