use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::InsertUser,
        schema::{RoleEntity, UserEntity},
    },
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError>;
    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError>;

    /// Inserts the user and grants `role_name` in one transaction. The role is
    /// created when missing.
    async fn create_with_role(
        &self,
        user: &InsertUser,
        role_name: &str,
    ) -> Result<Uuid, error::SystemError>;
}

#[async_trait::async_trait]
pub trait RoleRepository {
    async fn find_role_by_name(&self, name: &str)
        -> Result<Option<RoleEntity>, error::SystemError>;
    async fn create_role(&self, name: &str) -> Result<RoleEntity, error::SystemError>;

    /// Idempotent: granting a role the user already has is not an error.
    async fn add_role_to_user(
        &self,
        user_id: &Uuid,
        role_id: &Uuid,
    ) -> Result<(), error::SystemError>;
}
