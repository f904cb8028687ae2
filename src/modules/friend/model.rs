use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::{
    friend::schema::{FriendRequestEntity, FriendRequestStatus, FriendshipEntity},
    user::schema::UserEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendResponse {
    pub id: Uuid,
    pub name: String,
    pub profile_picture: Option<String>,
}

impl From<UserEntity> for FriendResponse {
    fn from(user: UserEntity) -> Self {
        FriendResponse { id: user.id, name: user.name, profile_picture: user.profile_picture }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDirection {
    Incoming,
    Outgoing,
}

/// A friend request as seen by one of its two parties.
#[derive(Debug, Clone, Serialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub direction: RequestDirection,
    pub other_user_id: Uuid,
    pub status: FriendRequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl FriendRequestResponse {
    pub fn for_user(request: FriendRequestEntity, user_id: &Uuid) -> Self {
        let (direction, other_user_id) = if request.sender_id == *user_id {
            (RequestDirection::Outgoing, request.receiver_id)
        } else {
            (RequestDirection::Incoming, request.sender_id)
        };

        FriendRequestResponse {
            id: request.id,
            direction,
            other_user_id,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AcceptedFriendRequest {
    pub request: FriendRequestEntity,
    pub friendship: FriendshipEntity,
}

#[derive(Debug, Deserialize)]
pub struct FriendRequestQuery {
    pub status: Option<FriendRequestStatus>,
}
