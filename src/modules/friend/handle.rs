use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::friend::{
        model::{AcceptedFriendRequest, FriendRequestQuery, FriendRequestResponse, FriendResponse},
        schema::{BlockedUserEntity, FriendRequestEntity},
        service::FriendService,
    },
};

#[post("/requests/{user_id}")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendService>,
    receiver_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let request = friend_service.send_friend_request(sender_id, *receiver_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[get("/requests")]
pub async fn list_friend_requests(
    friend_service: web::Data<FriendService>,
    query: web::Query<FriendRequestQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.get_friend_requests(user_id, query.status).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[post("/requests/{request_id}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendService>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<AcceptedFriendRequest>, error::Error> {
    let receiver_id = get_claims(&req)?.sub;
    let accepted = friend_service.accept_friend_request(receiver_id, *request_id).await?;

    Ok(success::Success::ok(Some(accepted)).message("Friend request accepted"))
}

#[post("/requests/{request_id}/decline")]
pub async fn decline_friend_request(
    friend_service: web::Data<FriendService>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let receiver_id = get_claims(&req)?.sub;
    let declined = friend_service.decline_friend_request(receiver_id, *request_id).await?;

    Ok(success::Success::ok(Some(declined)).message("Friend request declined"))
}

#[delete("/requests/{request_id}")]
pub async fn delete_friend_request(
    friend_service: web::Data<FriendService>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    friend_service.delete_friend_request(user_id, *request_id).await?;
    Ok(success::Success::no_content())
}

#[get("")]
pub async fn list_friends(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.get_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/ids")]
pub async fn list_friend_ids(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<Uuid>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let ids = friend_service.list_friends(user_id).await?;

    Ok(success::Success::ok(Some(ids)))
}

#[delete("/{friend_id}")]
pub async fn remove_friend(
    friend_service: web::Data<FriendService>,
    friend_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    friend_service.remove_friend(user_id, *friend_id).await?;
    Ok(success::Success::no_content())
}

#[get("")]
pub async fn list_blocked_users(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<BlockedUserEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let blocks = friend_service.get_blocked_users(user_id).await?;

    Ok(success::Success::ok(Some(blocks)).message("Blocked users retrieved successfully"))
}

#[post("/{user_id}")]
pub async fn block_user(
    friend_service: web::Data<FriendService>,
    blocked_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<BlockedUserEntity>, error::Error> {
    let blocker_id = get_claims(&req)?.sub;
    let block = friend_service.block_user(blocker_id, *blocked_id).await?;

    Ok(success::Success::created(Some(block)).message("User blocked successfully"))
}

#[delete("/{user_id}")]
pub async fn unblock_user(
    friend_service: web::Data<FriendService>,
    blocked_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let blocker_id = get_claims(&req)?.sub;
    friend_service.unblock_user(blocker_id, *blocked_id).await?;
    Ok(success::Success::no_content())
}
