use std::sync::Arc;

use uuid::Uuid;

use super::dto::ReactionOutcome;
use crate::domain::{
    comment::{entity::Comment, repository::CommentRepository},
    errors::DomainError,
    vote::{
        entity::{Vote, VoteKind},
        repository::VoteRepository,
    },
};

/// Applies like/dislike/un-vote transitions, keeping the vote ledger and the
/// comment's cached counters consistent.
///
/// The transition table is hysteretic: a first click records the vote, a
/// repeat of the same click withdraws it, and the opposite click moves the
/// vote across without ever changing a counter by more than one.
///
/// The ledger row is the authoritative write and always happens first; its
/// unique index doubles as the lock against two concurrent requests for the
/// same `(user, comment)` pair both seeing "no existing vote". A losing
/// insert comes back as a conflict and is replayed against the row that won.
pub struct ReactionUseCase {
    comments: Arc<dyn CommentRepository>,
    votes: Arc<dyn VoteRepository>,
}

impl ReactionUseCase {
    pub fn new(comments: Arc<dyn CommentRepository>, votes: Arc<dyn VoteRepository>) -> Self {
        Self { comments, votes }
    }

    pub async fn react(
        &self,
        comment_id: Uuid,
        user_email: &str,
        reaction: VoteKind,
        user_id: Option<Uuid>,
    ) -> Result<ReactionOutcome, DomainError> {
        let user_email = user_email.trim();
        if user_email.is_empty() {
            return Err(DomainError::ValidationError(
                "An email is required to vote".into(),
            ));
        }

        self.comments
            .find_by_id(comment_id)
            .await?
            .filter(Comment::is_visible)
            .ok_or_else(|| DomainError::NotFound(format!("Comment {}", comment_id)))?;

        let existing = self.votes.find_vote(user_email, comment_id).await?;

        let (comment, message) = match existing {
            None => {
                match self
                    .votes
                    .create_vote(user_email, comment_id, reaction, user_id)
                    .await
                {
                    Ok(_) => {
                        let comment = self.bump(comment_id, reaction, 1).await?;
                        (comment, format!("{} added", reaction.as_str()))
                    }
                    Err(DomainError::Conflict(_)) => {
                        // Lost the race against a concurrent request for the
                        // same pair; replay against the winner's row.
                        let winner = self
                            .votes
                            .find_vote(user_email, comment_id)
                            .await?
                            .ok_or_else(|| {
                                DomainError::Conflict(
                                    "Vote changed concurrently, please retry".into(),
                                )
                            })?;
                        self.transition_existing(winner, reaction).await?
                    }
                    Err(e) => return Err(e),
                }
            }
            Some(vote) => self.transition_existing(vote, reaction).await?,
        };

        tracing::debug!(
            comment_id = %comment.id,
            likes = comment.likes,
            dislikes = comment.dislikes,
            "reaction applied"
        );
        Ok(ReactionOutcome { comment, message })
    }

    /// Toggle-off on a repeated click, switch on the opposite one.
    async fn transition_existing(
        &self,
        vote: Vote,
        reaction: VoteKind,
    ) -> Result<(Comment, String), DomainError> {
        if vote.vote == reaction {
            self.votes.delete_vote(vote.id).await?;
            let comment = self.bump(vote.comment_id, reaction, -1).await?;
            Ok((comment, format!("{} removed", reaction.as_str())))
        } else {
            self.votes.update_vote(vote.id, reaction).await?;
            let (like_delta, dislike_delta) = match reaction {
                VoteKind::Like => (1, -1),
                VoteKind::Dislike => (-1, 1),
            };
            let comment = self
                .comments
                .increment_counters(vote.comment_id, like_delta, dislike_delta)
                .await?;
            Ok((comment, format!("Vote changed to {}", reaction.as_str())))
        }
    }

    async fn bump(
        &self,
        comment_id: Uuid,
        side: VoteKind,
        delta: i32,
    ) -> Result<Comment, DomainError> {
        let (like_delta, dislike_delta) = match side {
            VoteKind::Like => (delta, 0),
            VoteKind::Dislike => (0, delta),
        };
        self.comments
            .increment_counters(comment_id, like_delta, dislike_delta)
            .await
    }

    /// Recounts a comment's counters from the ledger, overwriting whatever
    /// drift a failed partial write left behind. Operational facility, not
    /// part of the request path.
    pub async fn repair_counters(&self, comment_id: Uuid) -> Result<Comment, DomainError> {
        let comment = self.comments.recount_counters(comment_id).await?;
        tracing::info!(
            comment_id = %comment.id,
            likes = comment.likes,
            dislikes = comment.dislikes,
            "counters recounted from vote ledger"
        );
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        comment::repository::MockCommentRepository, vote::repository::MockVoteRepository,
    };

    #[tokio::test]
    async fn reacting_to_missing_comment_is_not_found() {
        let mut comments = MockCommentRepository::new();
        comments.expect_find_by_id().returning(|_| Ok(None));
        let mut votes = MockVoteRepository::new();
        votes.expect_find_vote().never();

        let uc = ReactionUseCase::new(Arc::new(comments), Arc::new(votes));
        let err = uc
            .react(Uuid::now_v7(), "a@x.com", VoteKind::Like, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_email_is_rejected_before_any_lookup() {
        let mut comments = MockCommentRepository::new();
        comments.expect_find_by_id().never();
        let votes = MockVoteRepository::new();

        let uc = ReactionUseCase::new(Arc::new(comments), Arc::new(votes));
        let err = uc
            .react(Uuid::now_v7(), "   ", VoteKind::Dislike, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
