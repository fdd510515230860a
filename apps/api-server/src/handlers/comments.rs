//! Comment CRUD handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use social_core::domain::Comment;
use social_core::error::RepoError;
use social_core::ports::{BaseRepository, CommentRepository};
use social_shared::DetailResponse;
use social_shared::dto::{CommentRequest, CommentResponse, Pagination};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        content: comment.content,
        post_id: comment.post_id,
        user_id: comment.user_id,
        created_at: comment.created_at,
    }
}

fn comment_not_found() -> AppError {
    AppError::NotFound("Comment not found".to_string())
}

async fn find_owned_comment(
    state: &AppState,
    comment_id: Uuid,
    actor: Uuid,
    action: &str,
) -> AppResult<Comment> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or_else(comment_not_found)?;

    if !comment.is_owned_by(actor) {
        tracing::debug!(%comment_id, %actor, "Rejected {action} by non-owner");
        return Err(AppError::Forbidden(format!(
            "Not authorized to {action} this comment"
        )));
    }

    Ok(comment)
}

/// POST /comments/
pub async fn create_comment(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post_not_found = || AppError::NotFound("Post not found".to_string());

    if state.posts.find_by_id(req.post_id).await?.is_none() {
        return Err(post_not_found());
    }

    // The post can still vanish before the insert lands.
    let comment = state
        .comments
        .insert(Comment::new(req.post_id, user.id, req.content))
        .await
        .map_err(|e| match e {
            RepoError::ForeignKey(_) => post_not_found(),
            other => other.into(),
        })?;

    tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "Comment created");

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// GET /comments/{comment_id}
pub async fn read_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(comment_not_found)?;

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// GET /comments/
pub async fn list_comments(
    state: web::Data<AppState>,
    page: web::Query<Pagination>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list(page.skip, page.limit).await?;

    let body: Vec<CommentResponse> = comments.into_iter().map(comment_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PUT /comments/{comment_id}
///
/// Only the content changes; the body's `post_id` is not used to move the comment.
pub async fn update_comment(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut comment = find_owned_comment(&state, path.into_inner(), user.id, "update").await?;

    comment.content = req.content;
    let comment = state.comments.update(comment).await?;

    tracing::info!(comment_id = %comment.id, "Comment updated");

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = find_owned_comment(&state, path.into_inner(), user.id, "delete").await?;

    state.comments.delete(comment.id).await?;

    tracing::info!(comment_id = %comment.id, "Comment deleted");

    Ok(HttpResponse::Ok().json(DetailResponse::new("Comment deleted successfully")))
}
