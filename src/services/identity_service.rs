//! Credential store
//!
//! [`UserManager`] owns user identity rules: user name and email validation,
//! duplicate detection, password validation and bcrypt hashing. It never opens
//! its own transaction; callers pass the connection (usually the mutation's
//! transaction) so identity writes commit or roll back with everything else.

use std::collections::HashSet;
use std::sync::Arc;

use bcrypt::{hash, verify};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::config::{AppConfig, PasswordPolicyConfig};
use crate::database::entities::users;
use crate::errors::{
    CoreError, CoreResult, IdentityError, IdentityErrorCode, IdentityOutcome, IdentityResult,
};

const ALLOWED_USER_NAME_SYMBOLS: &[char] = &['-', '.', '_', '@', '+'];

/// Checks a candidate password; may inspect the user it is meant for.
pub trait PasswordValidator: Send + Sync {
    fn validate(&self, user: Option<&users::Model>, password: &str) -> IdentityResult;
}

/// Character-class and length rules from [`PasswordPolicyConfig`].
#[derive(Clone, Debug)]
pub struct PasswordPolicy {
    config: PasswordPolicyConfig,
}

impl PasswordPolicy {
    pub fn new(config: PasswordPolicyConfig) -> Self {
        Self { config }
    }
}

impl PasswordValidator for PasswordPolicy {
    fn validate(&self, _user: Option<&users::Model>, password: &str) -> IdentityResult {
        let config = &self.config;
        let mut errors = Vec::new();

        if password.chars().count() < config.required_length {
            errors.push(IdentityError::new(
                IdentityErrorCode::PasswordTooShort,
                format!(
                    "Passwords must be at least {} characters.",
                    config.required_length
                ),
            ));
        }
        if config.require_non_alphanumeric && password.chars().all(char::is_alphanumeric) {
            errors.push(IdentityError::new(
                IdentityErrorCode::PasswordRequiresNonAlphanumeric,
                "Passwords must have at least one non alphanumeric character.",
            ));
        }
        if config.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push(IdentityError::new(
                IdentityErrorCode::PasswordRequiresDigit,
                "Passwords must have at least one digit ('0'-'9').",
            ));
        }
        if config.require_lowercase && !password.chars().any(char::is_lowercase) {
            errors.push(IdentityError::new(
                IdentityErrorCode::PasswordRequiresLower,
                "Passwords must have at least one lowercase ('a'-'z').",
            ));
        }
        if config.require_uppercase && !password.chars().any(char::is_uppercase) {
            errors.push(IdentityError::new(
                IdentityErrorCode::PasswordRequiresUpper,
                "Passwords must have at least one uppercase ('A'-'Z').",
            ));
        }
        if config.required_unique_chars > 1 {
            let unique = password.chars().collect::<HashSet<_>>().len();
            if unique < config.required_unique_chars {
                errors.push(IdentityError::new(
                    IdentityErrorCode::PasswordRequiresUniqueChars,
                    format!(
                        "Passwords must use at least {} different characters.",
                        config.required_unique_chars
                    ),
                ));
            }
        }

        IdentityResult::from_errors(errors)
    }
}

/// Fields of a user that does not exist yet.
#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub user_name: String,
    pub email: Option<String>,
    pub display_name: String,
    pub roles: Vec<String>,
    pub tenant_id: Option<i32>,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct UserManager {
    validators: Vec<Arc<dyn PasswordValidator>>,
    bcrypt_cost: u32,
}

impl UserManager {
    pub fn new(config: &AppConfig) -> Self {
        let policy: Arc<dyn PasswordValidator> =
            Arc::new(PasswordPolicy::new(config.password_policy.clone()));
        Self::with_validators(vec![policy], config.bcrypt_cost)
    }

    pub fn with_validators(validators: Vec<Arc<dyn PasswordValidator>>, bcrypt_cost: u32) -> Self {
        Self {
            validators,
            bcrypt_cost,
        }
    }

    pub fn password_validators(&self) -> &[Arc<dyn PasswordValidator>] {
        &self.validators
    }

    /// Run every configured validator and merge their errors.
    pub fn validate_password(&self, user: Option<&users::Model>, password: &str) -> IdentityResult {
        let errors = self
            .validators
            .iter()
            .flat_map(|validator| validator.validate(user, password).errors().to_vec())
            .collect();
        IdentityResult::from_errors(errors)
    }

    pub fn check_password(&self, user: &users::Model, password: &str) -> CoreResult<bool> {
        match &user.password_hash {
            Some(password_hash) => verify(password, password_hash).map_err(|e| {
                CoreError::internal(format!("Failed to verify password: {}", e))
            }),
            None => Ok(false),
        }
    }

    /// Insert a user without a credential.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        user: NewUser,
    ) -> CoreResult<IdentityOutcome<users::Model>> {
        self.insert(conn, user, None).await
    }

    /// Insert a user with a hashed credential; the password is validated first.
    pub async fn create_with_password<C: ConnectionTrait>(
        &self,
        conn: &C,
        user: NewUser,
        password: &str,
    ) -> CoreResult<IdentityOutcome<users::Model>> {
        let validation = self.validate_password(None, password);
        if !validation.succeeded() {
            return Ok(Err(validation));
        }

        let password_hash = match self.hash_password(password) {
            Ok(password_hash) => password_hash,
            Err(failure) => return Ok(Err(failure)),
        };

        self.insert(conn, user, Some(password_hash)).await
    }

    /// Validate and save every non-key field of `user`.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        user: users::Model,
    ) -> CoreResult<IdentityOutcome<users::Model>> {
        let validation = self
            .validate_user(conn, Some(user.id), &user.user_name, user.email.as_deref())
            .await?;
        if !validation.succeeded() {
            return Ok(Err(validation));
        }

        persist(conn, user).await.map(Ok)
    }

    pub async fn remove_password<C: ConnectionTrait>(
        &self,
        conn: &C,
        user: users::Model,
    ) -> CoreResult<IdentityOutcome<users::Model>> {
        let mut user = user;
        user.password_hash = None;
        persist(conn, user).await.map(Ok)
    }

    pub async fn add_password<C: ConnectionTrait>(
        &self,
        conn: &C,
        user: users::Model,
        password: &str,
    ) -> CoreResult<IdentityOutcome<users::Model>> {
        if user.has_password() {
            return Ok(Err(IdentityResult::failed(vec![IdentityError::new(
                IdentityErrorCode::UserAlreadyHasPassword,
                "User already has a password set.",
            )])));
        }

        let validation = self.validate_password(Some(&user), password);
        if !validation.succeeded() {
            return Ok(Err(validation));
        }

        let password_hash = match self.hash_password(password) {
            Ok(password_hash) => password_hash,
            Err(failure) => return Ok(Err(failure)),
        };

        let mut user = user;
        user.password_hash = Some(password_hash);
        persist(conn, user).await.map(Ok)
    }

    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        user: NewUser,
        password_hash: Option<String>,
    ) -> CoreResult<IdentityOutcome<users::Model>> {
        let validation = self
            .validate_user(conn, None, &user.user_name, user.email.as_deref())
            .await?;
        if !validation.succeeded() {
            return Ok(Err(validation));
        }

        let mut active = users::ActiveModel::new().set_roles(&user.roles)?;
        active.user_name = Set(user.user_name);
        active.email = Set(user.email);
        active.display_name = Set(user.display_name);
        active.password_hash = Set(password_hash);
        active.tenant_id = Set(user.tenant_id);
        active.is_active = Set(user.is_active);

        let created = active
            .insert(conn)
            .await
            .map_err(|e| CoreError::from_db("insert user", e))?;
        Ok(Ok(created))
    }

    async fn validate_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        existing_id: Option<i32>,
        user_name: &str,
        email: Option<&str>,
    ) -> CoreResult<IdentityResult> {
        let mut errors = Vec::new();

        if !is_valid_user_name(user_name) {
            errors.push(invalid_user_name(user_name));
        } else {
            let mut query = users::Entity::find().filter(users::Column::UserName.eq(user_name));
            if let Some(id) = existing_id {
                query = query.filter(users::Column::Id.ne(id));
            }
            let duplicate = query
                .one(conn)
                .await
                .map_err(|e| CoreError::from_db("find user by name", e))?;
            if duplicate.is_some() {
                errors.push(IdentityError::new(
                    IdentityErrorCode::DuplicateUserName,
                    format!("User name '{}' is already taken.", user_name),
                ));
            }
        }

        if let Some(email) = email {
            if !is_valid_email(email) {
                errors.push(IdentityError::new(
                    IdentityErrorCode::InvalidEmail,
                    format!("Email '{}' is invalid.", email),
                ));
            } else {
                let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
                if let Some(id) = existing_id {
                    query = query.filter(users::Column::Id.ne(id));
                }
                let duplicate = query
                    .one(conn)
                    .await
                    .map_err(|e| CoreError::from_db("find user by email", e))?;
                if duplicate.is_some() {
                    errors.push(IdentityError::new(
                        IdentityErrorCode::DuplicateEmail,
                        format!("Email '{}' is already taken.", email),
                    ));
                }
            }
        }

        Ok(IdentityResult::from_errors(errors))
    }

    fn hash_password(&self, password: &str) -> Result<String, IdentityResult> {
        hash(password, self.bcrypt_cost).map_err(|e| {
            IdentityResult::failed(vec![IdentityError::new(
                IdentityErrorCode::PasswordHashFailed,
                format!("Failed to hash password: {}", e),
            )])
        })
    }
}

async fn persist<C: ConnectionTrait>(conn: &C, user: users::Model) -> CoreResult<users::Model> {
    let id = user.id;
    let mut active: users::ActiveModel = user.clone().into();
    active.user_name = Set(user.user_name);
    active.email = Set(user.email);
    active.display_name = Set(user.display_name);
    active.password_hash = Set(user.password_hash);
    active.roles = Set(user.roles);
    active.tenant_id = Set(user.tenant_id);
    active.is_active = Set(user.is_active);
    let active = active.set_updated_at();

    active
        .update(conn)
        .await
        .map_err(|e| CoreError::from_db(&format!("update user {}", id), e))
}

fn is_valid_user_name(user_name: &str) -> bool {
    !user_name.is_empty()
        && user_name
            .chars()
            .all(|c| c.is_alphanumeric() || ALLOWED_USER_NAME_SYMBOLS.contains(&c))
}

fn invalid_user_name(user_name: &str) -> IdentityError {
    let symbols: String = ALLOWED_USER_NAME_SYMBOLS.iter().collect();
    IdentityError::new(
        IdentityErrorCode::InvalidUserName,
        format!(
            "User name '{}' is invalid, can only contain letters, digits or '{}'.",
            user_name, symbols
        ),
    )
}

fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 254 {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local_part, domain_part) = (parts[0], parts[1]);
    !local_part.is_empty()
        && domain_part.contains('.')
        && !domain_part.starts_with('.')
        && !domain_part.ends_with('.')
}
