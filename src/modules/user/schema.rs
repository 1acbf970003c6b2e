use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A row of the `user_accounts` view: the user plus the names of its roles.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub hash_password: String,
    pub display_name: String,
    pub roles: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoleEntity {
    pub id: Uuid,
    pub name: String,
}
