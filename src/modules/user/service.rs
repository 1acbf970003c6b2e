use log::{info, warn};
use std::sync::Arc;

use crate::api::error;
use crate::constants::ROLE_USER;
use crate::modules::user::model::{
    AddRoleToUserModel, CreateAccountModel, InsertUser, RoleModel, RoleResponse, SignInModel,
    TokenResponse, UserResponse,
};
use crate::modules::user::repository::{RoleRepository, UserRepository};
use crate::modules::user::schema::UserEntity;
use crate::utils::{hash_password, verify_password, Claims, TypeClaims};
use crate::ENV;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    role_repo: Arc<dyn RoleRepository + Send + Sync>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        role_repo: Arc<dyn RoleRepository + Send + Sync>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, role_repo }
    }

    pub async fn create_account(
        &self,
        user: CreateAccountModel,
    ) -> Result<UserResponse, error::SystemError> {
        if self.repo.find_by_username(&user.username).await?.is_some() {
            return Err(error::SystemError::conflict("Username already exists"));
        }

        let hash_password = hash_password(&user.password)?;
        let display_name = user.display_name.unwrap_or_else(|| user.username.clone());

        let new_user = InsertUser {
            username: user.username,
            email: user.email,
            hash_password,
            display_name,
        };

        let user_id = self.repo.create_with_role(&new_user, ROLE_USER).await?;

        let entity = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        info!("Account {} created", entity.username);
        Ok(UserResponse::from(entity))
    }

    pub async fn sign_in(&self, user: SignInModel) -> Result<TokenResponse, error::SystemError> {
        let user_entity = self
            .repo
            .find_by_username(&user.username)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid username or password"))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            warn!("Failed sign in for {}", user.username);
            return Err(error::SystemError::unauthorized("Invalid username or password"));
        }

        let access_token = issue_token(&user_entity, TypeClaims::AccessToken)?;
        let refresh_token = issue_token(&user_entity, TypeClaims::RefreshToken)?;

        info!("User {} signed in", user_entity.username);
        Ok(TokenResponse { access_token, refresh_token })
    }

    /// Trades a refresh token for a new access token. The refresh token is
    /// handed back unchanged.
    pub async fn refresh(
        &self,
        refresh_token: Option<String>,
    ) -> Result<TokenResponse, error::SystemError> {
        let refresh_token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| error::SystemError::unauthorized("Refresh token is missing"))?;

        let claims = match Claims::decode(&refresh_token, ENV.jwt_secret.as_ref()) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Rejected refresh token: {e}");
                return Err(error::SystemError::forbidden("Token Invalid or Expired"));
            }
        };

        if claims._type != TypeClaims::RefreshToken {
            return Err(error::SystemError::forbidden("Token Invalid or Expired"));
        }

        let user_entity = self
            .repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| error::SystemError::forbidden("Token Invalid or Expired"))?;

        let access_token = issue_token(&user_entity, TypeClaims::AccessToken)?;
        Ok(TokenResponse { access_token, refresh_token })
    }

    pub async fn get_users(&self) -> Result<Vec<UserResponse>, error::SystemError> {
        let users = self.repo.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn save_role(&self, role: RoleModel) -> Result<RoleResponse, error::SystemError> {
        if self.role_repo.find_role_by_name(&role.name).await?.is_some() {
            return Err(error::SystemError::conflict("Role already exists"));
        }
        let role = self.role_repo.create_role(&role.name).await?;
        info!("Role {} saved", role.name);
        Ok(RoleResponse::from(role))
    }

    pub async fn add_role_to_user(
        &self,
        model: AddRoleToUserModel,
    ) -> Result<(), error::SystemError> {
        let user = self
            .repo
            .find_by_username(&model.username)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        let role = self
            .role_repo
            .find_role_by_name(&model.role_name)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Role not found"))?;

        self.role_repo.add_role_to_user(&user.id, &role.id).await?;
        info!("Role {} granted to {}", role.name, user.username);
        Ok(())
    }
}

fn issue_token(user: &UserEntity, kind: TypeClaims) -> Result<String, error::SystemError> {
    let expiration = match kind {
        TypeClaims::AccessToken => ENV.access_token_expiration,
        TypeClaims::RefreshToken => ENV.refresh_token_expiration,
    };
    Claims::new(&user.id, &user.username, &user.roles, expiration, kind)
        .encode(ENV.jwt_secret.as_ref())
}
