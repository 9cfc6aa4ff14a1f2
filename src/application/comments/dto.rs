use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::domain::comment::entity::PostType;

/// Client payload for posting a comment or reply.
///
/// `user_email` is only honored for guests; authenticated requests take
/// their identity from the verified claims instead.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateCommentRequest {
    pub author: String,
    pub content: String,
    pub post_slug: String,
    pub post_title: String,
    pub post_type: PostType,
    pub user_email: Option<String>,
    pub parent_comment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Identity of the caller as established by the authentication collaborator.
///
/// The comment system only needs two facts: which account (if any) is acting,
/// and whether it carries the admin capability.
#[derive(Debug, Clone, Default)]
pub struct Requester {
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl Requester {
    pub fn can_modify(&self, owner: Option<Uuid>) -> bool {
        if self.is_admin {
            return true;
        }
        match (self.user_id, owner) {
            (Some(requester), Some(owner)) => requester == owner,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_modify_anything() {
        let admin = Requester {
            user_id: None,
            email: None,
            is_admin: true,
        };
        assert!(admin.can_modify(Some(Uuid::now_v7())));
        assert!(admin.can_modify(None));
    }

    #[test]
    fn owner_match_requires_both_ids() {
        let id = Uuid::now_v7();
        let owner = Requester {
            user_id: Some(id),
            email: None,
            is_admin: false,
        };
        assert!(owner.can_modify(Some(id)));
        assert!(!owner.can_modify(Some(Uuid::now_v7())));
        // Guest comments have no owner; only admins may touch them.
        assert!(!owner.can_modify(None));
        assert!(!Requester::default().can_modify(None));
    }
}
