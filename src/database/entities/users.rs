use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_name: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[sea_orm(column_type = "Text", default_value = "[]")]
    pub roles: String, // JSON array stored as string
    pub tenant_id: Option<i32>,
    pub is_active: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

impl Model {
    /// Decoded role column; a corrupt column is an error.
    pub fn try_role_names(&self) -> CoreResult<Vec<String>> {
        serde_json::from_str::<Vec<String>>(&self.roles).map_err(|e| {
            CoreError::internal(format!("Failed to decode roles of user {}: {}", self.id, e))
        })
    }

    /// Decoded role column for display; a corrupt column yields no roles.
    pub fn role_names(&self) -> Vec<String> {
        match self.try_role_names() {
            Ok(roles) => roles,
            Err(err) => {
                tracing::warn!(user_id = self.id, "{}", err.message());
                Vec::new()
            }
        }
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id",
        on_delete = "SetNull"
    )]
    Tenants,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new() -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_name: ActiveValue::NotSet,
            email: Set(None),
            display_name: Set(String::new()),
            password_hash: Set(None),
            roles: Set("[]".to_string()),
            tenant_id: Set(None),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(chrono::Utc::now()),
        }
    }

    pub fn set_roles(mut self, roles: &[String]) -> CoreResult<Self> {
        self.roles = Set(encode_roles(roles)?);
        Ok(self)
    }

    pub fn set_updated_at(mut self) -> Self {
        self.updated_at = Set(chrono::Utc::now());
        self
    }
}

pub fn encode_roles(roles: &[String]) -> CoreResult<String> {
    serde_json::to_string(roles)
        .map_err(|e| CoreError::internal(format!("Failed to encode roles: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    fn user_with_roles(roles: &str) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: 5,
            user_name: "ada".to_string(),
            email: None,
            display_name: "Ada".to_string(),
            password_hash: None,
            roles: roles.to_string(),
            tenant_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn roles_decode() {
        let user = user_with_roles(r#"["HostAdministrator","Member"]"#);
        assert_eq!(
            user.try_role_names().unwrap(),
            vec!["HostAdministrator".to_string(), "Member".to_string()]
        );
    }

    #[test]
    fn corrupt_roles_are_reported() {
        let user = user_with_roles("HostAdministrator");
        let err = user.try_role_names().unwrap_err();
        assert_eq!(err.kind(), CoreErrorKind::Internal);
        assert!(err.message().contains("user 5"));
        assert!(user.role_names().is_empty());
    }

    #[test]
    fn set_roles_encodes_json() {
        let active = ActiveModel::new()
            .set_roles(&["Member".to_string()])
            .unwrap();
        assert_eq!(active.roles, Set(r#"["Member"]"#.to_string()));
    }
}
