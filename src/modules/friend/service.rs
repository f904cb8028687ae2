use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{AcceptedFriendRequest, FriendRequestResponse, FriendResponse},
            repository::FriendRepo,
            schema::{BlockedUserEntity, FriendRequestEntity, FriendRequestStatus},
        },
        user::{repository::UserRepository, schema::UserEntity},
    },
};

/// State transitions of the friend-request / friendship / block graph.
#[derive(Clone)]
pub struct FriendService {
    friend_repo: Arc<dyn FriendRepo>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl FriendService {
    pub fn with_dependencies(
        friend_repo: Arc<dyn FriendRepo>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        log::info!("FriendService initialized with dependencies");
        FriendService { friend_repo, user_repo }
    }

    async fn resolve_user(&self, user_id: &Uuid) -> Result<UserEntity, error::SystemError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    pub async fn send_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        if receiver_id == sender_id {
            return Err(error::SystemError::invalid_operation(
                "You cannot send a friend request to yourself",
            ));
        }

        self.resolve_user(&receiver_id).await?;

        if self.friend_repo.find_pending_friend_request(&sender_id, &receiver_id).await?.is_some()
        {
            return Err(error::SystemError::conflict("Friend request already sent"));
        }

        // Concurrent senders race on the pair's unique constraint; the loser gets `Conflict`.
        let request = self.friend_repo.create_friend_request(&sender_id, &receiver_id).await?;

        log::info!("Friend request {} sent from {} to {}", request.id, sender_id, receiver_id);
        Ok(request)
    }

    pub async fn accept_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<AcceptedFriendRequest, error::SystemError> {
        let accepted = self
            .friend_repo
            .accept_friend_request_atomic(&request_id, &user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        log::info!(
            "Friend request {} accepted, {} and {} are now friends",
            request_id,
            accepted.request.sender_id,
            accepted.request.receiver_id
        );
        Ok(accepted)
    }

    pub async fn decline_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let request = self
            .friend_repo
            .decline_friend_request(&request_id, &user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        log::info!("Friend request {} declined by {}", request_id, user_id);
        Ok(request)
    }

    pub async fn delete_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let request = self
            .friend_repo
            .find_friend_request_by_id(&request_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if !request.involves(&user_id) {
            return Err(error::SystemError::forbidden(
                "You are not allowed to delete this friend request",
            ));
        }

        self.friend_repo.delete_friend_request(&request_id).await?;

        log::info!("Friend request {} deleted by {}", request_id, user_id);
        Ok(())
    }

    pub async fn get_friend_requests(
        &self,
        user_id: Uuid,
        status: Option<FriendRequestStatus>,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let requests = self.friend_repo.find_friend_requests_for_user(&user_id).await?;

        Ok(requests
            .into_iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .map(|r| FriendRequestResponse::for_user(r, &user_id))
            .collect())
    }

    pub async fn remove_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.resolve_user(&friend_id).await?;

        let removed = self.friend_repo.delete_friendship(&user_id, &friend_id).await?;
        if removed == 0 {
            return Err(error::SystemError::not_found("You are not friends"));
        }

        log::info!("Friendship between {} and {} removed", user_id, friend_id);
        Ok(())
    }

    pub async fn list_friends(&self, user_id: Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        self.friend_repo.find_friend_ids(&user_id).await
    }

    pub async fn get_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let ids = self.list_friends(user_id).await?;
        let users = self.user_repo.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(FriendResponse::from).collect())
    }

    pub async fn block_user(
        &self,
        blocker_id: Uuid,
        blocked_id: Uuid,
    ) -> Result<BlockedUserEntity, error::SystemError> {
        if blocker_id == blocked_id {
            return Err(error::SystemError::invalid_operation("You cannot block yourself"));
        }

        self.resolve_user(&blocked_id).await?;

        if self.friend_repo.find_block(&blocker_id, &blocked_id).await?.is_some() {
            return Err(error::SystemError::conflict("User already blocked"));
        }

        let block = self.friend_repo.create_block(&blocker_id, &blocked_id).await?;

        log::info!("User {} blocked {}", blocker_id, blocked_id);
        Ok(block)
    }

    pub async fn unblock_user(
        &self,
        blocker_id: Uuid,
        blocked_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.resolve_user(&blocked_id).await?;

        let removed = self.friend_repo.delete_block(&blocker_id, &blocked_id).await?;
        if removed > 0 {
            log::info!("User {} unblocked {}", blocker_id, blocked_id);
        }
        Ok(())
    }

    pub async fn get_blocked_users(
        &self,
        blocker_id: Uuid,
    ) -> Result<Vec<BlockedUserEntity>, error::SystemError> {
        self.friend_repo.find_blocks_by_blocker(&blocker_id).await
    }
}
