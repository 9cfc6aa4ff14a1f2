use crate::{
    config::Config,
    domain::{comment::repository::CommentRepository, vote::repository::VoteRepository},
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub comment_repo: Arc<dyn CommentRepository>,
    pub vote_repo: Arc<dyn VoteRepository>,
}
