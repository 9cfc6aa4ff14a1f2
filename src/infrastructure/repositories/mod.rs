pub mod sqlx_comment_repository;
pub mod sqlx_vote_repository;
