use super::entity::{Comment, CommentStats, NewComment, PostType};
use crate::domain::{errors::DomainError, shared::pagination::PageRequest};
use async_trait::async_trait;
use uuid::Uuid;

/// Durable store of comments.
///
/// All listing operations are filtered to visible comments
/// (`is_approved && !is_spam`); `find_by_id` is not, so moderation and
/// ownership checks can still reach hidden records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, new: NewComment) -> Result<Comment, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;

    /// One page of visible top-level comments, newest first.
    async fn find_top_level(
        &self,
        post_slug: &str,
        post_type: Option<PostType>,
        page: &PageRequest,
    ) -> Result<Vec<Comment>, DomainError>;

    /// Total visible top-level comments for pagination metadata.
    async fn count_top_level(
        &self,
        post_slug: &str,
        post_type: Option<PostType>,
    ) -> Result<i64, DomainError>;

    /// Every visible comment of a post in one round-trip, oldest first, so
    /// the thread assembler can build the reply forest in memory.
    async fn find_for_post(
        &self,
        post_slug: &str,
        post_type: Option<PostType>,
    ) -> Result<Vec<Comment>, DomainError>;

    /// Visible direct replies to one comment, oldest first.
    async fn find_children(&self, parent_id: Uuid) -> Result<Vec<Comment>, DomainError>;

    /// Only the body is mutable after creation; refreshes `updated_at`.
    async fn update_content(&self, id: Uuid, content: &str) -> Result<Comment, DomainError>;

    /// Removes exactly this record; replies are not cascaded.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    /// Atomic, zero-clamped adjustment of the cached vote counters.
    async fn increment_counters(
        &self,
        id: Uuid,
        like_delta: i32,
        dislike_delta: i32,
    ) -> Result<Comment, DomainError>;

    /// Overwrites both counters with fresh counts from the vote ledger.
    /// Drift repair only, never part of the request path.
    async fn recount_counters(&self, id: Uuid) -> Result<Comment, DomainError>;

    async fn aggregate_stats(&self, post_slug: &str) -> Result<CommentStats, DomainError>;
}
