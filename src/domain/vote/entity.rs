use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One user's standing vote on one comment.
///
/// At most one row exists per `(user_email, comment_id)` pair; "no vote" is
/// the absence of the row, never a third enum value. The row is created on
/// first reaction, flipped in place on a direction switch, and deleted when
/// the user repeats the same reaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS, sqlx::FromRow)]
#[ts(export)]
pub struct Vote {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_email: String,
    pub comment_id: Uuid,
    pub vote: VoteKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    pub fn opposite(self) -> Self {
        match self {
            VoteKind::Like => VoteKind::Dislike,
            VoteKind::Dislike => VoteKind::Like,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoteKind::Like => "like",
            VoteKind::Dislike => "dislike",
        }
    }
}

impl std::str::FromStr for VoteKind {
    type Err = crate::domain::errors::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" => Ok(VoteKind::Like),
            "dislike" => Ok(VoteKind::Dislike),
            other => Err(crate::domain::errors::DomainError::ValidationError(
                format!("Reaction must be 'like' or 'dislike', got '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn vote_kind_parses_and_flips() {
        assert_eq!(VoteKind::from_str("like").unwrap(), VoteKind::Like);
        assert_eq!(VoteKind::from_str(" Dislike ").unwrap(), VoteKind::Dislike);
        assert!(VoteKind::from_str("meh").is_err());
        assert_eq!(VoteKind::Like.opposite(), VoteKind::Dislike);
        assert_eq!(VoteKind::Dislike.opposite(), VoteKind::Like);
    }
}
