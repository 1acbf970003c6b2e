use actix_web::{post, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{FriendRequestBody, FriendRequestResponse, FriendshipResponse},
            service::FriendService,
        },
        stats::model::StatsResponse,
        user::model::{UserRef, UserResponse},
    },
    utils::ValidatedJson,
};

const USER_NOT_FOUND: &str = "User not found";

#[post("/sendRequest")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendService>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestResponse>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let request = friend_service
        .send_friend_request(sender_id, body.0)
        .await
        .map_err(error::Error::unprocessable_as(USER_NOT_FOUND))?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

/// Same as `sendRequest`, but a rejection carries the reason.
#[post("/sendRequest2")]
pub async fn send_friend_request_detailed(
    friend_service: web::Data<FriendService>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestResponse>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let request = friend_service
        .send_friend_request(sender_id, body.0)
        .await
        .map_err(error::Error::unprocessable_from)?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[post("/acceptRequest")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendService>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipResponse>, error::Error> {
    let receiver_id = get_claims(&req)?.sub;
    let friendship = friend_service
        .accept_friend_request(receiver_id, body.0)
        .await
        .map_err(error::Error::unprocessable_as(USER_NOT_FOUND))?;

    Ok(success::Success::created(Some(friendship)).message("Friend request accepted successfully"))
}

#[post("/declineRequest")]
pub async fn decline_friend_request(
    friend_service: web::Data<FriendService>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    friend_service
        .decline_friend_request(user_id, body.0)
        .await
        .map_err(error::Error::unprocessable_as(USER_NOT_FOUND))?;
    Ok(success::Success::accepted())
}

#[post("/getIncomingRequests")]
pub async fn get_incoming_requests(
    friend_service: web::Data<FriendService>,
    user: ValidatedJson<UserRef>,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let requests = friend_service
        .get_incoming_requests(user.0)
        .await
        .map_err(error::Error::unprocessable_as(USER_NOT_FOUND))?;
    Ok(success::Success::ok(Some(requests)).message("Incoming requests retrieved successfully"))
}

#[post("/getOutgoingRequests")]
pub async fn get_outgoing_requests(
    friend_service: web::Data<FriendService>,
    user: ValidatedJson<UserRef>,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let requests = friend_service
        .get_outgoing_requests(user.0)
        .await
        .map_err(error::Error::unprocessable_as(USER_NOT_FOUND))?;
    Ok(success::Success::ok(Some(requests)).message("Outgoing requests retrieved successfully"))
}

#[post("/getFriends")]
pub async fn get_friends(
    friend_service: web::Data<FriendService>,
    user: ValidatedJson<UserRef>,
) -> Result<success::Success<Vec<UserResponse>>, error::Error> {
    let friends = friend_service
        .get_friends(user.0)
        .await
        .map_err(error::Error::unprocessable_as(USER_NOT_FOUND))?;
    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[post("/getFriendsStats")]
pub async fn get_friends_stats(
    friend_service: web::Data<FriendService>,
    user: ValidatedJson<UserRef>,
) -> Result<success::Success<Vec<StatsResponse>>, error::Error> {
    let stats = friend_service
        .get_friends_stats(user.0)
        .await
        .map_err(error::Error::unprocessable_as(USER_NOT_FOUND))?;
    Ok(success::Success::ok(Some(stats)).message("Friends stats retrieved successfully"))
}
