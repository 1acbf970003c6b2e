//! Shared fixtures for the HTTP contract tests: an in-memory store behind the
//! repository traits and helpers to build the app around it.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, Once,
};

use uuid::Uuid;

use crate::{
    api::error,
    constants::{ROLE_ADMIN, ROLE_USER},
    modules::{
        friend::{
            repository::{FriendRepo, FriendRepository, FriendRequestRepository},
            schema::{FriendRequestEntity, FriendshipEntity},
            service::FriendService,
        },
        stats::{
            model::SaveStatsModel, repository::StatsRepository, schema::StatsEntity,
            service::StatsService,
        },
        user::{
            model::InsertUser,
            repository::{RoleRepository, UserRepository},
            schema::{RoleEntity, UserEntity},
            service::UserService,
        },
    },
    utils::{Claims, TypeClaims},
    ENV,
};

macro_rules! test_app {
    ($store:expr) => {{
        let (user_service, friend_service, stats_service) = $crate::test::services(&$store);
        actix_web::test::init_service($crate::build_app(user_service, friend_service, stats_service))
            .await
    }};
}

/// Status of a call whether the app answered or a middleware rejected it.
macro_rules! status_of {
    ($app:expr, $req:expr) => {
        match actix_web::test::try_call_service(&$app, $req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.as_response_error().status_code(),
        }
    };
}


static INIT: Once = Once::new();

pub fn init_env() {
    INIT.call_once(|| {
        std::env::set_var("SECRET_KEY", "test-secret");
        std::env::set_var("DATABASE_URL", "postgres://unused@localhost/unused");
        std::env::set_var("RUST_LOG", "off");
        std::sync::LazyLock::force(&ENV);
    });
}

pub fn services(store: &Arc<MemoryStore>) -> (UserService, FriendService, StatsService) {
    init_env();
    (
        UserService::with_dependencies(store.clone(), store.clone()),
        FriendService::with_dependencies(store.clone(), store.clone(), store.clone()),
        StatsService::with_dependencies(store.clone(), store.clone()),
    )
}

pub fn access_token(user: &UserEntity) -> String {
    init_env();
    Claims::new(&user.id, &user.username, &user.roles, 600, TypeClaims::AccessToken)
        .encode(ENV.jwt_secret.as_ref())
        .unwrap()
}

pub fn refresh_token(user: &UserEntity) -> String {
    init_env();
    Claims::new(&user.id, &user.username, &user.roles, 1800, TypeClaims::RefreshToken)
        .encode(ENV.jwt_secret.as_ref())
        .unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[derive(Default)]
struct State {
    users: Vec<UserEntity>,
    roles: Vec<RoleEntity>,
    user_roles: Vec<(Uuid, Uuid)>,
    requests: Vec<FriendRequestEntity>,
    friendships: Vec<FriendshipEntity>,
    stats: Vec<StatsEntity>,
}

impl State {
    fn with_roles(&self, user: &UserEntity) -> UserEntity {
        let mut roles: Vec<String> = self
            .user_roles
            .iter()
            .filter(|(user_id, _)| *user_id == user.id)
            .filter_map(|(_, role_id)| self.roles.iter().find(|r| r.id == *role_id))
            .map(|r| r.name.clone())
            .collect();
        roles.sort();
        UserEntity { roles, ..user.clone() }
    }
}

fn same_pair(a: &Uuid, b: &Uuid, x: &Uuid, y: &Uuid) -> bool {
    (a == x && b == y) || (a == y && b == x)
}

fn new_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
}

pub struct MemoryStore {
    state: Mutex<State>,
    fail_role_grants: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        let mut state = State::default();
        for name in [ROLE_USER, ROLE_ADMIN] {
            state.roles.push(RoleEntity { id: new_id(), name: name.to_string() });
        }
        Arc::new(Self { state: Mutex::new(state), fail_role_grants: AtomicBool::new(false) })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Inserts a user directly, skipping password hashing.
    pub fn insert_user(&self, username: &str, roles: &[&str]) -> UserEntity {
        let mut state = self.state();
        let user = UserEntity {
            id: new_id(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            hash_password: "not-a-real-hash".to_string(),
            display_name: username.to_string(),
            roles: Vec::new(),
            created_at: chrono::Utc::now(),
        };
        state.users.push(user.clone());
        for role in roles {
            let role_id = state.roles.iter().find(|r| r.name == *role).unwrap().id;
            state.user_roles.push((user.id, role_id));
        }
        state.with_roles(&user)
    }

    pub fn insert_request(&self, sender: &UserEntity, receiver: &UserEntity) -> FriendRequestEntity {
        let request = FriendRequestEntity {
            id: new_id(),
            sender_id: sender.id,
            receiver_id: receiver.id,
            created_at: chrono::Utc::now(),
        };
        self.state().requests.push(request.clone());
        request
    }

    pub fn insert_friendship(&self, sender: &UserEntity, receiver: &UserEntity) {
        self.state().friendships.push(FriendshipEntity {
            id: new_id(),
            sender_id: sender.id,
            receiver_id: receiver.id,
            created_at: chrono::Utc::now(),
        });
    }

    pub fn insert_stats(&self, user: &UserEntity, games_played: i32, games_won: i32, best_score: i64) {
        self.state().stats.push(StatsEntity {
            id: new_id(),
            user_id: user.id,
            games_played,
            games_won,
            best_score,
            updated_at: chrono::Utc::now(),
        });
    }

    /// Makes account creation fail at the role grant, as a dropped
    /// connection mid-transaction would.
    pub fn fail_role_grants(&self, fail: bool) {
        self.fail_role_grants.store(fail, Ordering::SeqCst);
    }

    pub fn user_exists(&self, username: &str) -> bool {
        self.state().users.iter().any(|u| u.username.eq_ignore_ascii_case(username))
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    pub fn are_friends(&self, a: &UserEntity, b: &UserEntity) -> bool {
        self.state().friendships.iter().any(|f| same_pair(&f.sender_id, &f.receiver_id, &a.id, &b.id))
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let state = self.state();
        Ok(state.users.iter().find(|u| u.id == *id).map(|u| state.with_roles(u)))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let state = self.state();
        Ok(state
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .map(|u| state.with_roles(u)))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError> {
        let state = self.state();
        let mut users: Vec<UserEntity> =
            state.users.iter().filter(|u| ids.contains(&u.id)).map(|u| state.with_roles(u)).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError> {
        let state = self.state();
        let mut users: Vec<UserEntity> = state.users.iter().map(|u| state.with_roles(u)).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn create_with_role(
        &self,
        user: &InsertUser,
        role_name: &str,
    ) -> Result<Uuid, error::SystemError> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.username.eq_ignore_ascii_case(&user.username)) {
            return Err(error::SystemError::conflict("Username already exists"));
        }
        // Nothing is written until every step has succeeded.
        if self.fail_role_grants.load(Ordering::SeqCst) {
            return Err(error::SystemError::DatabaseError("connection reset".into()));
        }
        let role_id = match state.roles.iter().find(|r| r.name == role_name) {
            Some(role) => role.id,
            None => {
                let role = RoleEntity { id: new_id(), name: role_name.to_string() };
                let id = role.id;
                state.roles.push(role);
                id
            }
        };
        let id = new_id();
        state.users.push(UserEntity {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            display_name: user.display_name.clone(),
            roles: Vec::new(),
            created_at: chrono::Utc::now(),
        });
        state.user_roles.push((id, role_id));
        Ok(id)
    }
}

#[async_trait::async_trait]
impl RoleRepository for MemoryStore {
    async fn find_role_by_name(
        &self,
        name: &str,
    ) -> Result<Option<RoleEntity>, error::SystemError> {
        Ok(self.state().roles.iter().find(|r| r.name == name).cloned())
    }

    async fn create_role(&self, name: &str) -> Result<RoleEntity, error::SystemError> {
        let mut state = self.state();
        if state.roles.iter().any(|r| r.name == name) {
            return Err(error::SystemError::conflict("Name already exists"));
        }
        let role = RoleEntity { id: new_id(), name: name.to_string() };
        state.roles.push(role.clone());
        Ok(role)
    }

    async fn add_role_to_user(
        &self,
        user_id: &Uuid,
        role_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let mut state = self.state();
        if !state.user_roles.contains(&(*user_id, *role_id)) {
            state.user_roles.push((*user_id, *role_id));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl FriendRepository for MemoryStore {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Ok(self
            .state()
            .friendships
            .iter()
            .find(|f| same_pair(&f.sender_id, &f.receiver_id, user_id_a, user_id_b))
            .cloned())
    }

    async fn find_friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        Ok(self
            .state()
            .friendships
            .iter()
            .filter_map(|f| match (f.sender_id == *user_id, f.receiver_id == *user_id) {
                (true, _) => Some(f.receiver_id),
                (_, true) => Some(f.sender_id),
                _ => None,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for MemoryStore {
    async fn find_friend_request(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self
            .state()
            .requests
            .iter()
            .find(|r| same_pair(&r.sender_id, &r.receiver_id, user_id_a, user_id_b))
            .cloned())
    }

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self.state().requests.iter().find(|r| r.id == *request_id).cloned())
    }

    async fn find_friend_requests_from_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        Ok(self.state().requests.iter().filter(|r| r.sender_id == *user_id).cloned().collect())
    }

    async fn find_friend_requests_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        Ok(self.state().requests.iter().filter(|r| r.receiver_id == *user_id).cloned().collect())
    }

    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let mut state = self.state();
        if state.requests.iter().any(|r| same_pair(&r.sender_id, &r.receiver_id, sender_id, receiver_id)) {
            return Err(error::SystemError::conflict("Request already exists"));
        }
        let request = FriendRequestEntity {
            id: new_id(),
            sender_id: *sender_id,
            receiver_id: *receiver_id,
            created_at: chrono::Utc::now(),
        };
        state.requests.push(request.clone());
        Ok(request)
    }

    async fn delete_friend_request(&self, request_id: &Uuid) -> Result<bool, error::SystemError> {
        let mut state = self.state();
        let before = state.requests.len();
        state.requests.retain(|r| r.id != *request_id);
        Ok(state.requests.len() < before)
    }
}

#[async_trait::async_trait]
impl FriendRepo for MemoryStore {
    async fn accept_friend_request_atomic(
        &self,
        request_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let mut state = self.state();
        let request = state
            .requests
            .iter()
            .find(|r| r.id == *request_id)
            .cloned()
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.receiver_id != *user_id {
            return Err(error::SystemError::forbidden(
                "You are not allowed to accept this friend request",
            ));
        }

        let existing = state
            .friendships
            .iter()
            .find(|f| same_pair(&f.sender_id, &f.receiver_id, &request.sender_id, &request.receiver_id))
            .cloned();
        let friendship = match existing {
            Some(friendship) => friendship,
            None => {
                let friendship = FriendshipEntity {
                    id: new_id(),
                    sender_id: request.sender_id,
                    receiver_id: request.receiver_id,
                    created_at: chrono::Utc::now(),
                };
                state.friendships.push(friendship.clone());
                friendship
            }
        };
        state.requests.retain(|r| r.id != *request_id);
        Ok(friendship)
    }
}

#[async_trait::async_trait]
impl StatsRepository for MemoryStore {
    async fn find_by_user_ids(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<StatsEntity>, error::SystemError> {
        let mut stats: Vec<StatsEntity> =
            self.state().stats.iter().filter(|s| user_ids.contains(&s.user_id)).cloned().collect();
        stats.sort_by(|a, b| b.best_score.cmp(&a.best_score));
        Ok(stats)
    }

    async fn upsert(
        &self,
        user_id: &Uuid,
        stats: &SaveStatsModel,
    ) -> Result<StatsEntity, error::SystemError> {
        let mut state = self.state();
        let now = chrono::Utc::now();
        if let Some(existing) = state.stats.iter_mut().find(|s| s.user_id == *user_id) {
            existing.games_played = stats.games_played;
            existing.games_won = stats.games_won;
            existing.best_score = stats.best_score;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let entity = StatsEntity {
            id: new_id(),
            user_id: *user_id,
            games_played: stats.games_played,
            games_won: stats.games_won,
            best_score: stats.best_score,
            updated_at: now,
        };
        state.stats.push(entity.clone());
        Ok(entity)
    }
}
