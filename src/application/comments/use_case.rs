use std::sync::Arc;

use uuid::Uuid;

use super::dto::{CreateCommentRequest, Requester};
use crate::domain::{
    comment::{
        entity::{Comment, CommentStats, NewComment, validate_content},
        repository::CommentRepository,
    },
    errors::DomainError,
};

/// Creation, edit and deletion of comments, plus per-post stats.
///
/// Authorization is enforced here: mutations require the requester to own the
/// comment or carry the admin capability. Deletion is non-cascading; replies
/// of a deleted comment stay in the store and simply drop out of assembled
/// threads once their ancestor chain is broken.
pub struct CommentLifecycleUseCase {
    comments: Arc<dyn CommentRepository>,
}

impl CommentLifecycleUseCase {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }

    pub async fn create(
        &self,
        request: CreateCommentRequest,
        requester: &Requester,
    ) -> Result<Comment, DomainError> {
        // Authenticated identity wins over whatever the body claims.
        let user_email = requester.email.clone().or(request.user_email);

        let new = NewComment {
            author: request.author,
            content: request.content,
            post_slug: request.post_slug,
            post_title: request.post_title,
            post_type: request.post_type,
            user_id: requester.user_id,
            user_email,
            parent_comment_id: request.parent_comment_id,
        }
        .validated()?;

        if let Some(parent_id) = new.parent_comment_id {
            self.comments
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| {
                    DomainError::ValidationError(format!(
                        "Parent comment {} does not exist",
                        parent_id
                    ))
                })?;
        }

        let comment = self.comments.create(new).await?;
        tracing::info!(comment_id = %comment.id, post_slug = %comment.post_slug, "comment created");
        Ok(comment)
    }

    pub async fn update(
        &self,
        id: Uuid,
        content: &str,
        requester: &Requester,
    ) -> Result<Comment, DomainError> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Comment {}", id)))?;

        if !requester.can_modify(comment.user_id) {
            return Err(DomainError::Unauthorized);
        }

        let content = validate_content(content)?;
        self.comments.update_content(id, &content).await
    }

    pub async fn delete(&self, id: Uuid, requester: &Requester) -> Result<(), DomainError> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Comment {}", id)))?;

        if !requester.can_modify(comment.user_id) {
            return Err(DomainError::Unauthorized);
        }

        self.comments.delete(id).await?;
        tracing::info!(comment_id = %id, "comment deleted");
        Ok(())
    }

    pub async fn stats(&self, post_slug: &str) -> Result<CommentStats, DomainError> {
        self.comments.aggregate_stats(post_slug).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comment::{entity::PostType, repository::MockCommentRepository};
    use chrono::Utc;

    fn stored(user_id: Option<Uuid>) -> Comment {
        Comment {
            id: Uuid::now_v7(),
            author: "Alice".into(),
            content: "Hello".into(),
            post_slug: "slug".into(),
            post_title: "Title".into(),
            post_type: PostType::News,
            user_id,
            user_email: None,
            is_approved: true,
            is_spam: false,
            parent_comment_id: None,
            likes: 0,
            dislikes: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn update_by_stranger_is_rejected_without_touching_the_store() {
        let owner = Uuid::now_v7();
        let comment = stored(Some(owner));
        let id = comment.id;

        let mut repo = MockCommentRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(comment.clone())));
        repo.expect_update_content().never();

        let uc = CommentLifecycleUseCase::new(Arc::new(repo));
        let stranger = Requester {
            user_id: Some(Uuid::now_v7()),
            email: None,
            is_admin: false,
        };
        let err = uc.update(id, "edited", &stranger).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn delete_of_missing_comment_is_not_found() {
        let mut repo = MockCommentRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();

        let uc = CommentLifecycleUseCase::new(Arc::new(repo));
        let admin = Requester {
            user_id: None,
            email: None,
            is_admin: true,
        };
        let err = uc.delete(Uuid::now_v7(), &admin).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_dangling_parent_reference() {
        let mut repo = MockCommentRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_create().never();

        let uc = CommentLifecycleUseCase::new(Arc::new(repo));
        let request = CreateCommentRequest {
            author: "Bob".into(),
            content: "Hi".into(),
            post_slug: "slug".into(),
            post_title: "Title".into(),
            post_type: PostType::Rss,
            user_email: Some("bob@example.com".into()),
            parent_comment_id: Some(Uuid::now_v7()),
        };
        let err = uc
            .create(request, &Requester::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
