//! In-memory repositories backing the unit tests. They enforce the same
//! uniqueness rules as the Postgres schema.

use std::sync::{Arc, LazyLock, Mutex, MutexGuard, Once};

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::AcceptedFriendRequest,
            repository::{BlockRepository, FriendRepo, FriendRepository, FriendRequestRepository},
            schema::{BlockedUserEntity, FriendRequestEntity, FriendRequestStatus, FriendshipEntity},
        },
        user::{repository::UserRepository, schema::UserEntity},
    },
};

#[derive(Default)]
struct Tables {
    requests: Vec<FriendRequestEntity>,
    friendships: Vec<FriendshipEntity>,
    blocks: Vec<BlockedUserEntity>,
}

#[derive(Clone, Default)]
pub struct FriendRepositoryMemory {
    tables: Arc<Mutex<Tables>>,
    lookup_barrier: Option<Arc<tokio::sync::Barrier>>,
}

impl FriendRepositoryMemory {
    /// Holds every pending-request lookup result until `callers` lookups have run.
    pub fn with_lookup_barrier(callers: usize) -> Self {
        FriendRepositoryMemory {
            lookup_barrier: Some(Arc::new(tokio::sync::Barrier::new(callers))),
            ..Default::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn requests(&self) -> Vec<FriendRequestEntity> {
        self.lock().requests.clone()
    }

    pub fn friendships(&self) -> Vec<FriendshipEntity> {
        self.lock().friendships.clone()
    }
}

fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

fn connects(friendship: &FriendshipEntity, user_id_a: &Uuid, user_id_b: &Uuid) -> bool {
    (friendship.user1_id == *user_id_a && friendship.user2_id == *user_id_b)
        || (friendship.user1_id == *user_id_b && friendship.user2_id == *user_id_a)
}

fn other_side(friendship: &FriendshipEntity, user_id: &Uuid) -> Option<Uuid> {
    if friendship.user1_id == *user_id {
        Some(friendship.user2_id)
    } else if friendship.user2_id == *user_id {
        Some(friendship.user1_id)
    } else {
        None
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryMemory {
    async fn find_friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let mut ids: Vec<Uuid> = Vec::new();
        for other in self.lock().friendships.iter().filter_map(|f| other_side(f, user_id)) {
            if !ids.contains(&other) {
                ids.push(other);
            }
        }
        Ok(ids)
    }

    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<u64, error::SystemError> {
        let mut tables = self.lock();
        let before = tables.friendships.len();
        tables.friendships.retain(|f| !connects(f, user_id_a, user_id_b));
        Ok((before - tables.friendships.len()) as u64)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRepositoryMemory {
    async fn find_pending_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let found = self
            .lock()
            .requests
            .iter()
            .find(|r| {
                r.sender_id == *sender_id
                    && r.receiver_id == *receiver_id
                    && r.status == FriendRequestStatus::Pending
            })
            .cloned();

        if let Some(barrier) = &self.lookup_barrier {
            barrier.wait().await;
        }
        Ok(found)
    }

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self.lock().requests.iter().find(|r| r.id == *request_id).cloned())
    }

    async fn find_friend_requests_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        Ok(self.lock().requests.iter().rev().filter(|r| r.involves(user_id)).cloned().collect())
    }

    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let mut tables = self.lock();
        if tables.requests.iter().any(|r| r.sender_id == *sender_id && r.receiver_id == *receiver_id)
        {
            return Err(error::SystemError::Conflict(error::conflict_message(Some(
                "uq_friend_requests_pair",
            ))));
        }

        let request = FriendRequestEntity {
            id: Uuid::now_v7(),
            sender_id: *sender_id,
            receiver_id: *receiver_id,
            status: FriendRequestStatus::Pending,
            created_at: now(),
        };
        tables.requests.push(request.clone());
        Ok(request)
    }

    async fn decline_friend_request(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut tables = self.lock();
        let request = tables.requests.iter_mut().find(|r| {
            r.id == *request_id
                && r.receiver_id == *receiver_id
                && r.status == FriendRequestStatus::Pending
        });

        Ok(request.map(|r| {
            r.status = FriendRequestStatus::Declined;
            r.clone()
        }))
    }

    async fn delete_friend_request(&self, request_id: &Uuid) -> Result<(), error::SystemError> {
        self.lock().requests.retain(|r| r.id != *request_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl BlockRepository for FriendRepositoryMemory {
    async fn find_block(
        &self,
        blocker_id: &Uuid,
        blocked_id: &Uuid,
    ) -> Result<Option<BlockedUserEntity>, error::SystemError> {
        Ok(self
            .lock()
            .blocks
            .iter()
            .find(|b| b.blocker_id == *blocker_id && b.blocked_id == *blocked_id)
            .cloned())
    }

    async fn find_blocks_by_blocker(
        &self,
        blocker_id: &Uuid,
    ) -> Result<Vec<BlockedUserEntity>, error::SystemError> {
        Ok(self.lock().blocks.iter().rev().filter(|b| b.blocker_id == *blocker_id).cloned().collect())
    }

    async fn create_block(
        &self,
        blocker_id: &Uuid,
        blocked_id: &Uuid,
    ) -> Result<BlockedUserEntity, error::SystemError> {
        let mut tables = self.lock();
        if tables.blocks.iter().any(|b| b.blocker_id == *blocker_id && b.blocked_id == *blocked_id) {
            return Err(error::SystemError::Conflict(error::conflict_message(Some(
                "uq_blocked_users_pair",
            ))));
        }

        let block = BlockedUserEntity {
            id: Uuid::now_v7(),
            blocker_id: *blocker_id,
            blocked_id: *blocked_id,
            created_at: now(),
        };
        tables.blocks.push(block.clone());
        Ok(block)
    }

    async fn delete_block(
        &self,
        blocker_id: &Uuid,
        blocked_id: &Uuid,
    ) -> Result<u64, error::SystemError> {
        let mut tables = self.lock();
        let before = tables.blocks.len();
        tables.blocks.retain(|b| !(b.blocker_id == *blocker_id && b.blocked_id == *blocked_id));
        Ok((before - tables.blocks.len()) as u64)
    }
}

#[async_trait::async_trait]
impl FriendRepo for FriendRepositoryMemory {
    async fn accept_friend_request_atomic(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<AcceptedFriendRequest>, error::SystemError> {
        // Both writes happen under one guard.
        let mut tables = self.lock();

        let Some(request) = tables.requests.iter_mut().find(|r| {
            r.id == *request_id
                && r.receiver_id == *receiver_id
                && r.status == FriendRequestStatus::Pending
        }) else {
            return Ok(None);
        };
        request.status = FriendRequestStatus::Accepted;
        let request = request.clone();

        let existing = tables
            .friendships
            .iter()
            .find(|f| f.user1_id == request.sender_id && f.user2_id == request.receiver_id)
            .cloned();
        let friendship = match existing {
            Some(friendship) => friendship,
            None => {
                let friendship = FriendshipEntity {
                    id: Uuid::now_v7(),
                    user1_id: request.sender_id,
                    user2_id: request.receiver_id,
                    created_at: now(),
                };
                tables.friendships.push(friendship.clone());
                friendship
            }
        };

        Ok(Some(AcceptedFriendRequest { request, friendship }))
    }
}

#[derive(Clone, Default)]
pub struct UserRepositoryMemory {
    users: Arc<Mutex<Vec<UserEntity>>>,
}

impl UserRepositoryMemory {
    pub fn insert(&self, name: &str, email: &str) -> Uuid {
        let user = UserEntity {
            id: Uuid::now_v7(),
            email: email.to_string(),
            name: name.to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            profile_picture: None,
        };
        let id = user.id;
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(user);
        id
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryMemory {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let users = self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }
}

const TEST_SECRET: &str = "test-secret";

static INIT_ENV: Once = Once::new();

/// Sets the variables `ENV` requires and forces it to load.
pub fn init_env() {
    INIT_ENV.call_once(|| {
        std::env::set_var("SECRET_KEY", TEST_SECRET);
        std::env::set_var("DATABASE_URL", "postgres://localhost/soloquest_test");
        LazyLock::force(&crate::ENV);
    });
}

pub fn bearer(user_id: Uuid) -> String {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = crate::utils::Claims { sub: user_id, iat: now, exp: now + 3600 };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_pair_is_unique_regardless_of_status() {
        let store = FriendRepositoryMemory::default();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

        let request = store.create_friend_request(&a, &b).await.unwrap();
        store.decline_friend_request(&request.id, &b).await.unwrap();

        let err = store.create_friend_request(&a, &b).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Conflict(_)));
        assert!(store.create_friend_request(&b, &a).await.is_ok());
    }

    #[tokio::test]
    async fn accept_reuses_existing_friendship_row() {
        let store = FriendRepositoryMemory::default();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

        let first = store.create_friend_request(&a, &b).await.unwrap();
        let accepted = store.accept_friend_request_atomic(&first.id, &b).await.unwrap().unwrap();
        store.delete_friend_request(&first.id).await.unwrap();

        let second = store.create_friend_request(&a, &b).await.unwrap();
        let again = store.accept_friend_request_atomic(&second.id, &b).await.unwrap().unwrap();

        assert_eq!(again.friendship.id, accepted.friendship.id);
        assert_eq!(store.friendships().len(), 1);
    }

    #[tokio::test]
    async fn accept_of_missing_request_writes_nothing() {
        let store = FriendRepositoryMemory::default();

        let result = store.accept_friend_request_atomic(&Uuid::now_v7(), &Uuid::now_v7()).await;
        assert!(result.unwrap().is_none());
        assert!(store.friendships().is_empty());
    }
}
