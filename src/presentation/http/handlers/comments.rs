use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    application::{
        comments::{
            dto::{CreateCommentRequest, UpdateCommentRequest},
            use_case::CommentLifecycleUseCase,
        },
        reactions::{dto::ReactRequest, use_case::ReactionUseCase},
        threads::use_case::ThreadUseCase,
    },
    domain::{
        comment::entity::PostType, shared::pagination::PageRequest, vote::entity::VoteKind,
    },
    presentation::http::{errors::AppError, middleware::user::resolve_requester, state::AppState},
};

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub post_type: Option<String>,
    pub viewer_email: Option<String>,
}

fn parse_post_type(raw: Option<&str>) -> Result<Option<PostType>, AppError> {
    raw.map(PostType::from_str)
        .transpose()
        .map_err(AppError::from)
}

/// GET /api/v1/posts/{slug}/comments
///
/// The viewer identity used for `user_vote` annotation comes from the bearer
/// token when present, otherwise from the `viewer_email` query parameter.
pub async fn list_thread(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ThreadQuery>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let requester = resolve_requester(&headers, &state.config.jwt_secret);
    let viewer_email = requester.email.or(query.viewer_email);
    let post_type = parse_post_type(query.post_type.as_deref())?;
    let page = PageRequest::normalized(query.page, query.page_size);

    let thread = ThreadUseCase::new(state.comment_repo.clone(), state.vote_repo.clone())
        .get_thread(&slug, page, post_type, viewer_email.as_deref())
        .await?;
    Ok(Json(serde_json::to_value(thread).unwrap_or_default()))
}

/// GET /api/v1/posts/{slug}/comments/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let stats = CommentLifecycleUseCase::new(state.comment_repo.clone())
        .stats(&slug)
        .await?;
    Ok(Json(serde_json::to_value(stats).unwrap_or_default()))
}

/// POST /api/v1/comments
pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateCommentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let requester = resolve_requester(&headers, &state.config.jwt_secret);
    let comment = CommentLifecycleUseCase::new(state.comment_repo.clone())
        .create(body, &requester)
        .await?;
    Ok(Json(serde_json::to_value(comment).unwrap_or_default()))
}

/// PATCH /api/v1/comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let requester = resolve_requester(&headers, &state.config.jwt_secret);
    let comment = CommentLifecycleUseCase::new(state.comment_repo.clone())
        .update(id, &body.content, &requester)
        .await?;
    Ok(Json(serde_json::to_value(comment).unwrap_or_default()))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let requester = resolve_requester(&headers, &state.config.jwt_secret);
    CommentLifecycleUseCase::new(state.comment_repo.clone())
        .delete(id, &requester)
        .await?;
    Ok(Json(serde_json::json!({ "message": "Comment deleted" })))
}

/// POST /api/v1/comments/{id}/react
///
/// Voting identity: the bearer token's email when present, otherwise the
/// guest email in the body.
pub async fn react(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<ReactRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let requester = resolve_requester(&headers, &state.config.jwt_secret);
    let reaction = VoteKind::from_str(&body.reaction)?;
    let email = requester
        .email
        .or(body.user_email)
        .unwrap_or_default();

    let outcome = ReactionUseCase::new(state.comment_repo.clone(), state.vote_repo.clone())
        .react(id, &email, reaction, requester.user_id)
        .await?;
    Ok(Json(serde_json::to_value(outcome).unwrap_or_default()))
}
