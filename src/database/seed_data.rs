use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::info;

use crate::auth::HOST_ADMINISTRATOR;
use crate::database::entities::users;
use crate::errors::{CoreError, CoreResult, IdentityResult};
use crate::services::identity_service::{NewUser, UserManager};
use crate::services::unit_of_work;

/// Create the first host administrator, or return the existing user of that name.
///
/// Administrators can only be created by other administrators through the API,
/// so a fresh database needs one seeded out of band.
pub async fn create_host_administrator(
    db: &DatabaseConnection,
    user_manager: &UserManager,
    user_name: &str,
    password: &str,
) -> CoreResult<users::Model> {
    let existing = users::Entity::find()
        .filter(users::Column::UserName.eq(user_name))
        .one(db)
        .await
        .map_err(|e| CoreError::from_db("find user by name", e))?;

    if let Some(user) = existing {
        info!(user_id = user.id, "Host administrator '{}' already exists", user_name);
        return Ok(user);
    }

    let new_user = NewUser {
        user_name: user_name.to_string(),
        email: None,
        display_name: user_name.to_string(),
        roles: vec![HOST_ADMINISTRATOR.to_string()],
        tenant_id: None,
        is_active: true,
    };

    let txn = unit_of_work::begin(db).await?;
    let outcome = match user_manager
        .create_with_password(&txn, new_user, password)
        .await
    {
        Ok(created) => created.map_err(IdentityResult::into_error),
        Err(err) => Err(err),
    };
    let user = unit_of_work::finish(txn, outcome).await?;

    info!(user_id = user.id, "Created host administrator '{}'", user_name);
    Ok(user)
}
