use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::user::schema::{RoleEntity, UserEntity};

#[derive(Deserialize, Validate)]
pub struct CreateAccountModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "Display name cannot be empty"))]
    pub display_name: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RoleModel {
    #[validate(length(min = 1, max = 64, message = "Role name must be 1 to 64 characters long"))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct AddRoleToUserModel {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "Role name cannot be empty"))]
    pub role_name: String,
}

/// Reference to a user in a request body, by id or by username.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UserRef {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: Option<String>,
}

pub struct InsertUser {
    pub username: String,
    pub email: String,
    pub hash_password: String,
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// The only shape in which a user leaves the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub roles: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            display_name: entity.display_name,
            roles: entity.roles,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<RoleEntity> for RoleResponse {
    fn from(entity: RoleEntity) -> Self {
        RoleResponse { id: entity.id, name: entity.name }
    }
}
