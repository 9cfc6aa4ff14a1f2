use crate::domain::{
    comment::{
        entity::{Comment, CommentStats, NewComment, PostType},
        repository::CommentRepository,
    },
    errors::DomainError,
    shared::pagination::PageRequest,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str = "id, author, content, post_slug, post_title, post_type, \
     user_id, user_email, is_approved, is_spam, parent_comment_id, \
     likes, dislikes, created_at, updated_at";

pub struct SqlxCommentRepository {
    pub pool: PgPool,
}

impl SqlxCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn infra(e: sqlx::Error) -> DomainError {
    DomainError::InfrastructureError(e.to_string())
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, new: NewComment) -> Result<Comment, DomainError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (id, author, content, post_slug, post_title, post_type, \
                 user_id, user_email, parent_comment_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(&new.author)
        .bind(&new.content)
        .bind(&new.post_slug)
        .bind(&new.post_title)
        .bind(new.post_type)
        .bind(new.user_id)
        .bind(&new.user_email)
        .bind(new.parent_comment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)
    }

    async fn find_top_level(
        &self,
        post_slug: &str,
        post_type: Option<PostType>,
        page: &PageRequest,
    ) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE post_slug = $1 \
               AND ($2::text IS NULL OR post_type = $2) \
               AND parent_comment_id IS NULL \
               AND is_approved AND NOT is_spam \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        ))
        .bind(post_slug)
        .bind(post_type.map(|t| t.to_string()))
        .bind(page.page_size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(infra)
    }

    async fn count_top_level(
        &self,
        post_slug: &str,
        post_type: Option<PostType>,
    ) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments \
             WHERE post_slug = $1 \
               AND ($2::text IS NULL OR post_type = $2) \
               AND parent_comment_id IS NULL \
               AND is_approved AND NOT is_spam",
        )
        .bind(post_slug)
        .bind(post_type.map(|t| t.to_string()))
        .fetch_one(&self.pool)
        .await
        .map_err(infra)
    }

    async fn find_for_post(
        &self,
        post_slug: &str,
        post_type: Option<PostType>,
    ) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE post_slug = $1 \
               AND ($2::text IS NULL OR post_type = $2) \
               AND is_approved AND NOT is_spam \
             ORDER BY created_at ASC"
        ))
        .bind(post_slug)
        .bind(post_type.map(|t| t.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(infra)
    }

    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE parent_comment_id = $1 \
               AND is_approved AND NOT is_spam \
             ORDER BY created_at ASC"
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)
    }

    async fn update_content(&self, id: Uuid, content: &str) -> Result<Comment, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET content = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?
        .ok_or_else(|| DomainError::NotFound(format!("Comment {}", id)))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(infra)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Comment {}", id)));
        }
        Ok(())
    }

    async fn increment_counters(
        &self,
        id: Uuid,
        like_delta: i32,
        dislike_delta: i32,
    ) -> Result<Comment, DomainError> {
        // Single atomic statement; concurrent reactions from different users
        // must never lose updates to an application-level read-modify-write.
        sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments \
             SET likes = GREATEST(0, likes + $2), \
                 dislikes = GREATEST(0, dislikes + $3), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(like_delta)
        .bind(dislike_delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?
        .ok_or_else(|| DomainError::NotFound(format!("Comment {}", id)))
    }

    async fn recount_counters(&self, id: Uuid) -> Result<Comment, DomainError> {
        sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments \
             SET likes = (SELECT COUNT(*) FROM votes WHERE comment_id = $1 AND vote = 'like'), \
                 dislikes = (SELECT COUNT(*) FROM votes WHERE comment_id = $1 AND vote = 'dislike'), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?
        .ok_or_else(|| DomainError::NotFound(format!("Comment {}", id)))
    }

    async fn aggregate_stats(&self, post_slug: &str) -> Result<CommentStats, DomainError> {
        let (total_comments, total_likes, total_dislikes, avg_likes, avg_dislikes) =
            sqlx::query_as::<_, (i64, i64, i64, f64, f64)>(
                "SELECT COUNT(*), \
                        COALESCE(SUM(likes), 0)::bigint, \
                        COALESCE(SUM(dislikes), 0)::bigint, \
                        COALESCE(AVG(likes), 0)::float8, \
                        COALESCE(AVG(dislikes), 0)::float8 \
                 FROM comments \
                 WHERE post_slug = $1 AND is_approved AND NOT is_spam",
            )
            .bind(post_slug)
            .fetch_one(&self.pool)
            .await
            .map_err(infra)?;
        Ok(CommentStats {
            total_comments,
            total_likes,
            total_dislikes,
            avg_likes,
            avg_dislikes,
        })
    }
}
