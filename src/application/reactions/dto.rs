use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::domain::comment::entity::Comment;

/// Client payload for reacting to a comment.
///
/// `reaction` is kept as a raw string so a bad value surfaces as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReactRequest {
    pub reaction: String,
    pub user_email: Option<String>,
}

/// Result of a reaction: the comment with refreshed counters plus a short
/// human-readable description of what the click did.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ReactionOutcome {
    pub comment: Comment,
    pub message: String,
}
