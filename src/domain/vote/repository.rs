use super::entity::{Vote, VoteKind};
use crate::domain::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

/// Durable ledger of votes; the single source of truth preventing
/// double-voting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn find_vote(
        &self,
        user_email: &str,
        comment_id: Uuid,
    ) -> Result<Option<Vote>, DomainError>;

    /// Inserts a new vote row. The `(user_email, comment_id)` uniqueness
    /// invariant is enforced here: a duplicate insert fails with
    /// `DomainError::Conflict`, which the reaction service converts into an
    /// update of the row that won the race.
    async fn create_vote(
        &self,
        user_email: &str,
        comment_id: Uuid,
        vote: VoteKind,
        user_id: Option<Uuid>,
    ) -> Result<Vote, DomainError>;

    /// Flips an existing vote's direction in place, refreshing `updated_at`.
    async fn update_vote(&self, id: Uuid, vote: VoteKind) -> Result<Vote, DomainError>;

    async fn delete_vote(&self, id: Uuid) -> Result<(), DomainError>;

    /// Batch lookup of one user's votes across many comments, for annotating
    /// an assembled thread with the viewer's own reactions.
    async fn find_votes_for_user(
        &self,
        user_email: &str,
        comment_ids: &[Uuid],
    ) -> Result<Vec<Vote>, DomainError>;
}
