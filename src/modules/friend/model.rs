use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::user::model::{UserRef, UserResponse};

/// Body shared by the send, accept and decline endpoints. Sending needs the
/// two users, accepting and declining need the request id.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FriendRequestBody {
    pub id: Option<Uuid>,
    #[validate(nested)]
    pub sender: Option<UserRef>,
    #[validate(nested)]
    pub receiver: Option<UserRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub sender: UserResponse,
    pub receiver: UserResponse,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendshipResponse {
    pub id: Uuid,
    pub sender: UserResponse,
    pub receiver: UserResponse,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
