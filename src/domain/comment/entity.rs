use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

use crate::domain::errors::DomainError;

pub const MAX_AUTHOR_LEN: u64 = 100;
pub const MAX_CONTENT_LEN: u64 = 1000;

/// Core domain entity: a comment attached to an aggregated post.
///
/// Comments form a reply forest per post: `parent_comment_id` points at the
/// comment being replied to, `None` marks a top-level comment. The
/// `likes`/`dislikes` counters are denormalized aggregates of the vote
/// ledger, maintained by the reaction service.
///
/// # Invariants
/// - `likes` equals the number of `like` votes recorded for this comment in
///   the ledger (symmetrically for `dislikes`); drift from a failed partial
///   write is repaired by recounting, never on the read path.
/// - `post_slug`, `post_title` and `post_type` are immutable after creation.
/// - Only comments with `is_approved && !is_spam` are publicly visible.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct Comment {
    /// Unique identifier for this comment
    pub id: Uuid,

    /// Commenter display name (guest-supplied or account display name)
    pub author: String,

    /// Comment body text
    pub content: String,

    /// Slug of the external post this comment is attached to
    pub post_slug: String,

    /// Title of the external post, captured at creation time
    pub post_title: String,

    /// Which ingestion source produced the post
    pub post_type: PostType,

    /// Owning account, absent for guest comments
    pub user_id: Option<Uuid>,

    /// Guest or account email; doubles as the voting identity key
    pub user_email: Option<String>,

    /// Moderation flag: approved comments are visible
    pub is_approved: bool,

    /// Moderation flag: spam comments are hidden regardless of approval
    pub is_spam: bool,

    /// Parent comment when this is a reply, `None` for top-level
    pub parent_comment_id: Option<Uuid>,

    /// Cached like count (aggregate of the vote ledger)
    pub likes: i32,

    /// Cached dislike count (aggregate of the vote ledger)
    pub dislikes: i32,

    /// Timestamp when this comment was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent modification
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Returns true if this comment may appear in threads and stats.
    pub fn is_visible(&self) -> bool {
        self.is_approved && !self.is_spam
    }

    /// Returns true if the given account owns this comment.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}

/// External content source a comment can be attached to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PostType {
    Youtube,
    Facebook,
    News,
    Rss,
}

impl std::str::FromStr for PostType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(PostType::Youtube),
            "facebook" => Ok(PostType::Facebook),
            "news" => Ok(PostType::News),
            "rss" => Ok(PostType::Rss),
            other => Err(DomainError::ValidationError(format!(
                "Unknown post type: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PostType::Youtube => "youtube",
            PostType::Facebook => "facebook",
            PostType::News => "news",
            PostType::Rss => "rss",
        };
        f.write_str(s)
    }
}

/// Validated input for comment creation.
#[derive(Debug, Clone, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    #[validate(length(min = 1))]
    pub post_slug: String,
    #[validate(length(min = 1))]
    pub post_title: String,
    pub post_type: PostType,
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    pub parent_comment_id: Option<Uuid>,
}

impl NewComment {
    /// Trims text fields and enforces the creation constraints.
    pub fn validated(mut self) -> Result<Self, DomainError> {
        self.author = self.author.trim().to_string();
        self.content = self.content.trim().to_string();
        self.post_slug = self.post_slug.trim().to_string();
        self.post_title = self.post_title.trim().to_string();
        self.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        Ok(self)
    }
}

/// Validates an edited comment body against the same constraints as creation.
pub fn validate_content(content: &str) -> Result<String, DomainError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationError(
            "Comment content cannot be empty".into(),
        ));
    }
    if trimmed.chars().count() as u64 > MAX_CONTENT_LEN {
        return Err(DomainError::ValidationError(format!(
            "Comment content must be {} characters or less",
            MAX_CONTENT_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Aggregate engagement numbers for one post, over visible comments at all
/// reply depths.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommentStats {
    pub total_comments: i64,
    pub total_likes: i64,
    pub total_dislikes: i64,
    pub avg_likes: f64,
    pub avg_dislikes: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewComment {
        NewComment {
            author: "Alice".into(),
            content: "Hello".into(),
            post_slug: "breaking-news".into(),
            post_title: "Breaking News".into(),
            post_type: PostType::News,
            user_id: None,
            user_email: None,
            parent_comment_id: None,
        }
    }

    #[test]
    fn new_comment_accepts_expected_fields() {
        assert!(draft().validated().is_ok());
    }

    #[test]
    fn new_comment_rejects_blank_and_oversized_fields() {
        let mut c = draft();
        c.author = "   ".into();
        assert!(c.validated().is_err());

        let mut c = draft();
        c.content = "x".repeat(1001);
        assert!(c.validated().is_err());

        let mut c = draft();
        c.post_slug = String::new();
        assert!(c.validated().is_err());
    }

    #[test]
    fn post_type_round_trips_through_str() {
        use std::str::FromStr;
        assert_eq!(PostType::from_str("youtube").unwrap(), PostType::Youtube);
        assert_eq!(PostType::from_str(" RSS ").unwrap(), PostType::Rss);
        assert!(PostType::from_str("tiktok").is_err());
        assert_eq!(PostType::Facebook.to_string(), "facebook");
    }

    #[test]
    fn content_validation_trims_and_bounds() {
        assert_eq!(validate_content("  hi  ").unwrap(), "hi");
        assert!(validate_content("   ").is_err());
        assert!(validate_content(&"y".repeat(1001)).is_err());
        assert!(validate_content(&"y".repeat(1000)).is_ok());
    }
}
