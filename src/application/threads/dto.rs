use serde::Serialize;
use ts_rs::TS;

use crate::domain::{comment::entity::Comment, vote::entity::VoteKind};

/// One node of an assembled reply forest.
///
/// Carries the full comment, the viewing user's own vote (if any), the node's
/// depth below its top-level root, and the fully expanded replies beneath it.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ThreadNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub user_vote: Option<VoteKind>,
    pub depth: u32,
    pub replies: Vec<ThreadNode>,
}

/// One page of top-level comments with their reply trees.
///
/// Pagination metadata describes top-level comments only; reply trees within
/// the page are always fully expanded (up to the depth cap).
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ThreadPage {
    pub comments: Vec<ThreadNode>,
    pub count: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}
