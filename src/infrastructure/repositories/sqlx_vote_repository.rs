use crate::domain::{
    errors::DomainError,
    vote::{
        entity::{Vote, VoteKind},
        repository::VoteRepository,
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const VOTE_COLUMNS: &str = "id, user_id, user_email, comment_id, vote, created_at, updated_at";

pub struct SqlxVoteRepository {
    pub pool: PgPool,
}

impl SqlxVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn infra(e: sqlx::Error) -> DomainError {
    DomainError::InfrastructureError(e.to_string())
}

#[async_trait]
impl VoteRepository for SqlxVoteRepository {
    async fn find_vote(
        &self,
        user_email: &str,
        comment_id: Uuid,
    ) -> Result<Option<Vote>, DomainError> {
        sqlx::query_as::<_, Vote>(&format!(
            "SELECT {VOTE_COLUMNS} FROM votes WHERE user_email = $1 AND comment_id = $2"
        ))
        .bind(user_email)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)
    }

    async fn create_vote(
        &self,
        user_email: &str,
        comment_id: Uuid,
        vote: VoteKind,
        user_id: Option<Uuid>,
    ) -> Result<Vote, DomainError> {
        sqlx::query_as::<_, Vote>(&format!(
            "INSERT INTO votes (id, user_id, user_email, comment_id, vote) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {VOTE_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(user_email)
        .bind(comment_id)
        .bind(vote)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // The unique index on (user_email, comment_id) is the
            // double-vote guard; losing a concurrent race is a conflict the
            // reaction service knows how to replay.
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::Conflict(
                format!("Vote already exists for {} on {}", user_email, comment_id),
            ),
            _ => infra(e),
        })
    }

    async fn update_vote(&self, id: Uuid, vote: VoteKind) -> Result<Vote, DomainError> {
        sqlx::query_as::<_, Vote>(&format!(
            "UPDATE votes SET vote = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {VOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(vote)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?
        .ok_or_else(|| DomainError::NotFound(format!("Vote {}", id)))
    }

    async fn delete_vote(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM votes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(infra)?;
        Ok(())
    }

    async fn find_votes_for_user(
        &self,
        user_email: &str,
        comment_ids: &[Uuid],
    ) -> Result<Vec<Vote>, DomainError> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Vote>(&format!(
            "SELECT {VOTE_COLUMNS} FROM votes \
             WHERE user_email = $1 AND comment_id = ANY($2)"
        ))
        .bind(user_email)
        .bind(comment_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)
    }
}
