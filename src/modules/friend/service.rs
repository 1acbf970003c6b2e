use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{FriendRequestBody, FriendRequestResponse, FriendshipResponse},
            repository::{FriendRepo, FriendRepository, FriendRequestRepository},
            schema::{FriendRequestEntity, FriendshipEntity},
        },
        stats::{model::StatsResponse, repository::StatsRepository},
        user::{
            model::{UserRef, UserResponse},
            repository::UserRepository,
            schema::UserEntity,
        },
    },
};

#[derive(Clone)]
pub struct FriendService {
    friend_repo: Arc<dyn FriendRepo>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    stats_repo: Arc<dyn StatsRepository + Send + Sync>,
}

impl FriendService {
    pub fn with_dependencies(
        friend_repo: Arc<dyn FriendRepo>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        stats_repo: Arc<dyn StatsRepository + Send + Sync>,
    ) -> Self {
        info!("FriendService initialized with dependencies");
        FriendService { friend_repo, user_repo, stats_repo }
    }

    pub async fn send_friend_request(
        &self,
        actor_id: Uuid,
        body: FriendRequestBody,
    ) -> Result<FriendRequestResponse, error::SystemError> {
        let sender = self.resolve_user(body.sender.as_ref(), "Sender not found").await?;
        let receiver = self.resolve_user(body.receiver.as_ref(), "Receiver not found").await?;

        if sender.id != actor_id {
            return Err(error::SystemError::forbidden(
                "You can only send friend requests as yourself",
            ));
        }

        if sender.id == receiver.id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        let (friendship, pending): (Option<FriendshipEntity>, Option<FriendRequestEntity>) = tokio::try_join!(
            self.friend_repo.find_friendship(&sender.id, &receiver.id),
            self.friend_repo.find_friend_request(&sender.id, &receiver.id),
        )?;

        if friendship.is_some() {
            return Err(error::SystemError::conflict("Users are already friends"));
        }

        if pending.is_some() {
            return Err(error::SystemError::conflict("Friend request already exists"));
        }

        let request = self.friend_repo.create_friend_request(&sender.id, &receiver.id).await?;
        info!("Friend request {} sent from {} to {}", request.id, sender.username, receiver.username);

        Ok(FriendRequestResponse {
            id: request.id,
            sender: UserResponse::from(sender),
            receiver: UserResponse::from(receiver),
            created_at: request.created_at,
        })
    }

    pub async fn accept_friend_request(
        &self,
        actor_id: Uuid,
        body: FriendRequestBody,
    ) -> Result<FriendshipResponse, error::SystemError> {
        let request_id =
            body.id.ok_or_else(|| error::SystemError::bad_request("Friend request id is missing"))?;

        let friendship =
            self.friend_repo.accept_friend_request_atomic(&request_id, &actor_id).await?;
        info!("Friend request {} accepted, friendship {}", request_id, friendship.id);

        let mut users = self.users_by_id(&[friendship.sender_id, friendship.receiver_id]).await?;
        let (Some(sender), Some(receiver)) =
            (users.remove(&friendship.sender_id), users.remove(&friendship.receiver_id))
        else {
            return Err(error::SystemError::not_found("User not found"));
        };

        Ok(FriendshipResponse { id: friendship.id, sender, receiver, created_at: friendship.created_at })
    }

    /// Either party may drop a pending request: the receiver declines it, the
    /// sender withdraws it.
    pub async fn decline_friend_request(
        &self,
        actor_id: Uuid,
        body: FriendRequestBody,
    ) -> Result<(), error::SystemError> {
        let request_id =
            body.id.ok_or_else(|| error::SystemError::bad_request("Friend request id is missing"))?;

        let request = self
            .friend_repo
            .find_friend_request_by_id(&request_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.receiver_id != actor_id && request.sender_id != actor_id {
            return Err(error::SystemError::forbidden(
                "You are not allowed to decline this friend request",
            ));
        }

        if !self.friend_repo.delete_friend_request(&request_id).await? {
            return Err(error::SystemError::not_found("Friend request not found"));
        }
        info!("Friend request {} declined", request_id);

        Ok(())
    }

    pub async fn get_incoming_requests(
        &self,
        user: UserRef,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let user = self.resolve_user(Some(&user), "User not found").await?;
        let requests = self.friend_repo.find_friend_requests_to_user(&user.id).await?;
        self.to_request_responses(requests).await
    }

    pub async fn get_outgoing_requests(
        &self,
        user: UserRef,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let user = self.resolve_user(Some(&user), "User not found").await?;
        let requests = self.friend_repo.find_friend_requests_from_user(&user.id).await?;
        self.to_request_responses(requests).await
    }

    pub async fn get_friends(&self, user: UserRef) -> Result<Vec<UserResponse>, error::SystemError> {
        let user = self.resolve_user(Some(&user), "User not found").await?;
        let friend_ids = self.friend_repo.find_friend_ids(&user.id).await?;
        let friends = self.user_repo.find_by_ids(&friend_ids).await?;
        Ok(friends.into_iter().map(UserResponse::from).collect())
    }

    /// Stats of every friend that has saved any. Friends without stats are skipped.
    pub async fn get_friends_stats(
        &self,
        user: UserRef,
    ) -> Result<Vec<StatsResponse>, error::SystemError> {
        let user = self.resolve_user(Some(&user), "User not found").await?;
        let friend_ids = self.friend_repo.find_friend_ids(&user.id).await?;

        let (mut friends, stats) = tokio::try_join!(
            self.users_by_id(&friend_ids),
            self.stats_repo.find_by_user_ids(&friend_ids),
        )?;

        Ok(stats
            .into_iter()
            .filter_map(|entity| {
                let friend = friends.remove(&entity.user_id)?;
                Some(StatsResponse::new(entity, friend))
            })
            .collect())
    }

    async fn resolve_user(
        &self,
        user: Option<&UserRef>,
        not_found: &'static str,
    ) -> Result<UserEntity, error::SystemError> {
        let found = match user {
            Some(UserRef { id: Some(id), .. }) => self.user_repo.find_by_id(id).await?,
            Some(UserRef { username: Some(username), .. }) => {
                self.user_repo.find_by_username(username).await?
            }
            _ => None,
        };
        found.ok_or_else(|| error::SystemError::not_found(not_found))
    }

    async fn users_by_id(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, UserResponse>, error::SystemError> {
        let users = self.user_repo.find_by_ids(ids).await?;
        Ok(users.into_iter().map(|u| (u.id, UserResponse::from(u))).collect())
    }

    async fn to_request_responses(
        &self,
        requests: Vec<FriendRequestEntity>,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let mut ids: Vec<Uuid> =
            requests.iter().flat_map(|r| [r.sender_id, r.receiver_id]).collect();
        ids.sort_unstable();
        ids.dedup();

        let users = self.users_by_id(&ids).await?;

        Ok(requests
            .into_iter()
            .filter_map(|r| {
                let (Some(sender), Some(receiver)) =
                    (users.get(&r.sender_id), users.get(&r.receiver_id))
                else {
                    warn!("Friend request {} references a missing user", r.id);
                    return None;
                };
                Some(FriendRequestResponse {
                    id: r.id,
                    sender: sender.clone(),
                    receiver: receiver.clone(),
                    created_at: r.created_at,
                })
            })
            .collect())
    }
}
