use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::AcceptedFriendRequest,
        repository::{BlockRepository, FriendRepo, FriendRepository, FriendRequestRepository},
        schema::{BlockedUserEntity, FriendRequestEntity, FriendshipEntity},
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn new_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn find_friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT
                CASE
                    WHEN f.user1_id = $1 THEN f.user2_id
                    ELSE f.user1_id
                END
            FROM friendships f
            WHERE f.user1_id = $1
               OR f.user2_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<u64, error::SystemError> {
        let rows = sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE
                (user1_id = $1 AND user2_id = $2)
            OR (user1_id = $2 AND user2_id = $1)
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRepositoryPg {
    async fn find_pending_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT *
            FROM friend_requests
            WHERE sender_id = $1 AND receiver_id = $2 AND status = 'pending'
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request =
            sqlx::query_as::<_, FriendRequestEntity>("SELECT * FROM friend_requests WHERE id = $1")
                .bind(request_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(request)
    }

    async fn find_friend_requests_for_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        let requests = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT *
            FROM friend_requests
            WHERE sender_id = $1 OR receiver_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, sender_id, receiver_id, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    async fn decline_friend_request(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET status = 'declined'
            WHERE id = $1 AND receiver_id = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn delete_friend_request(&self, request_id: &Uuid) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM friend_requests WHERE id = $1")
            .bind(request_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl BlockRepository for FriendRepositoryPg {
    async fn find_block(
        &self,
        blocker_id: &Uuid,
        blocked_id: &Uuid,
    ) -> Result<Option<BlockedUserEntity>, error::SystemError> {
        let block = sqlx::query_as::<_, BlockedUserEntity>(
            "SELECT * FROM blocked_users WHERE blocker_id = $1 AND blocked_id = $2",
        )
        .bind(blocker_id)
        .bind(blocked_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(block)
    }

    async fn find_blocks_by_blocker(
        &self,
        blocker_id: &Uuid,
    ) -> Result<Vec<BlockedUserEntity>, error::SystemError> {
        let blocks = sqlx::query_as::<_, BlockedUserEntity>(
            "SELECT * FROM blocked_users WHERE blocker_id = $1 ORDER BY created_at DESC",
        )
        .bind(blocker_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(blocks)
    }

    async fn create_block(
        &self,
        blocker_id: &Uuid,
        blocked_id: &Uuid,
    ) -> Result<BlockedUserEntity, error::SystemError> {
        let block = sqlx::query_as::<_, BlockedUserEntity>(
            r#"
            INSERT INTO blocked_users (id, blocker_id, blocked_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(blocker_id)
        .bind(blocked_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(block)
    }

    async fn delete_block(
        &self,
        blocker_id: &Uuid,
        blocked_id: &Uuid,
    ) -> Result<u64, error::SystemError> {
        let rows =
            sqlx::query("DELETE FROM blocked_users WHERE blocker_id = $1 AND blocked_id = $2")
                .bind(blocker_id)
                .bind(blocked_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl FriendRepo for FriendRepositoryPg {
    async fn accept_friend_request_atomic(
        &self,
        request_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<AcceptedFriendRequest>, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        // The conditional update row-locks the request, so a concurrent
        // accept/decline sees it already resolved.
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET status = 'accepted'
            WHERE id = $1 AND receiver_id = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(receiver_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            tx.rollback().await?;
            return Ok(None);
        };

        // An existing row for the same ordered pair is reused.
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (id, user1_id, user2_id)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT uq_friendships_pair
            DO UPDATE SET user1_id = EXCLUDED.user1_id
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(request.sender_id)
        .bind(request.receiver_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(AcceptedFriendRequest { request, friendship }))
    }
}
