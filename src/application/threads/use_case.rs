use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::dto::{ThreadNode, ThreadPage};
use crate::domain::{
    comment::{
        entity::{Comment, PostType},
        repository::CommentRepository,
    },
    errors::DomainError,
    shared::pagination::PageRequest,
    vote::{entity::VoteKind, repository::VoteRepository},
};

/// Deepest reply level that gets expanded. A node sitting at the cap keeps an
/// empty reply list even when children exist, which also bounds the walk if
/// the parent chain is ever corrupted into a cycle.
pub const MAX_THREAD_DEPTH: u32 = 10;

/// Reconstructs the reply forest of a post from the flat parent-pointer
/// table.
///
/// All visible comments of the post are fetched in one round-trip and joined
/// into a parent-to-children adjacency map; the forest is then a pure
/// in-memory depth-first walk from the requested page of top-level roots.
/// The viewer's own votes are resolved with a single batch ledger lookup.
pub struct ThreadUseCase {
    comments: Arc<dyn CommentRepository>,
    votes: Arc<dyn VoteRepository>,
}

impl ThreadUseCase {
    pub fn new(comments: Arc<dyn CommentRepository>, votes: Arc<dyn VoteRepository>) -> Self {
        Self { comments, votes }
    }

    pub async fn get_thread(
        &self,
        post_slug: &str,
        page: PageRequest,
        post_type: Option<PostType>,
        viewer_email: Option<&str>,
    ) -> Result<ThreadPage, DomainError> {
        let roots = self
            .comments
            .find_top_level(post_slug, post_type, &page)
            .await?;
        let count = self.comments.count_top_level(post_slug, post_type).await?;
        let all = self.comments.find_for_post(post_slug, post_type).await?;

        // created_at ascending from the store, so each child list is already
        // in chronological conversation order.
        let mut children: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for comment in all.iter() {
            if let Some(parent_id) = comment.parent_comment_id {
                children.entry(parent_id).or_default().push(comment.clone());
            }
        }

        let viewer_votes = self.viewer_votes(viewer_email, &all).await?;

        let comments = roots
            .into_iter()
            .map(|root| build_node(root, 0, &children, &viewer_votes))
            .collect();

        let total_pages = page.total_pages(count);
        Ok(ThreadPage {
            comments,
            count,
            current_page: page.page,
            total_pages,
            has_next_page: page.page < total_pages,
            has_prev_page: page.page > 1,
        })
    }

    async fn viewer_votes(
        &self,
        viewer_email: Option<&str>,
        all: &[Comment],
    ) -> Result<HashMap<Uuid, VoteKind>, DomainError> {
        let email = match viewer_email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => email,
            None => return Ok(HashMap::new()),
        };
        let ids: Vec<Uuid> = all.iter().map(|c| c.id).collect();
        let votes = self.votes.find_votes_for_user(email, &ids).await?;
        Ok(votes.into_iter().map(|v| (v.comment_id, v.vote)).collect())
    }
}

fn build_node(
    comment: Comment,
    depth: u32,
    children: &HashMap<Uuid, Vec<Comment>>,
    viewer_votes: &HashMap<Uuid, VoteKind>,
) -> ThreadNode {
    let replies = if depth >= MAX_THREAD_DEPTH {
        Vec::new()
    } else {
        children
            .get(&comment.id)
            .map(|kids| {
                kids.iter()
                    .map(|kid| build_node(kid.clone(), depth + 1, children, viewer_votes))
                    .collect()
            })
            .unwrap_or_default()
    };
    let user_vote = viewer_votes.get(&comment.id).copied();
    ThreadNode {
        user_vote,
        depth,
        replies,
        comment,
    }
}
