use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::{
    model::AcceptedFriendRequest,
    schema::{BlockedUserEntity, FriendRequestEntity},
};

#[async_trait::async_trait]
pub trait FriendRepository {
    async fn find_friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError>;

    /// Removes the friendship in either ordering and returns the number of rows deleted.
    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<u64, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRequestRepository {
    async fn find_pending_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn find_friend_requests_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError>;

    /// Fails with `Conflict` when a request for the ordered pair already exists.
    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError>;

    /// Moves a pending request addressed to `receiver_id` to `declined`.
    /// Returns `None` when no such pending request exists.
    async fn decline_friend_request(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn delete_friend_request(&self, request_id: &Uuid) -> Result<(), error::SystemError>;
}

#[async_trait::async_trait]
pub trait BlockRepository {
    async fn find_block(
        &self,
        blocker_id: &Uuid,
        blocked_id: &Uuid,
    ) -> Result<Option<BlockedUserEntity>, error::SystemError>;

    async fn find_blocks_by_blocker(
        &self,
        blocker_id: &Uuid,
    ) -> Result<Vec<BlockedUserEntity>, error::SystemError>;

    /// Fails with `Conflict` when the ordered pair is already blocked.
    async fn create_block(
        &self,
        blocker_id: &Uuid,
        blocked_id: &Uuid,
    ) -> Result<BlockedUserEntity, error::SystemError>;

    async fn delete_block(
        &self,
        blocker_id: &Uuid,
        blocked_id: &Uuid,
    ) -> Result<u64, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRepo:
    FriendRepository + FriendRequestRepository + BlockRepository + Send + Sync
{
    /// Marks a pending request addressed to `receiver_id` as accepted and
    /// creates the friendship in the same transaction. Returns `None` without
    /// writing anything when no such pending request exists.
    async fn accept_friend_request_atomic(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<AcceptedFriendRequest>, error::SystemError>;
}
