//! Like handlers, mounted under /posts/{post_id}/likes.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use social_core::domain::Like;
use social_core::error::RepoError;
use social_core::ports::{BaseRepository, LikeRepository};
use social_shared::DetailResponse;
use social_shared::dto::LikeResponse;

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const ALREADY_LIKED: &str = "You have already liked this post";

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}

async fn ensure_post_exists(state: &AppState, post_id: Uuid) -> AppResult<()> {
    match state.posts.find_by_id(post_id).await? {
        Some(_) => Ok(()),
        None => Err(post_not_found()),
    }
}

/// POST /posts/{post_id}/likes
pub async fn create_like(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    ensure_post_exists(&state, post_id).await?;

    if state.likes.find(user.id, post_id).await?.is_some() {
        return Err(AppError::Conflict(ALREADY_LIKED.to_string()));
    }

    // The (user_id, post_id) key rejects a concurrent duplicate, and the post
    // may have been deleted since the check above.
    let like = state
        .likes
        .insert(Like::new(user.id, post_id))
        .await
        .map_err(|e| match e {
            RepoError::Constraint(_) => AppError::Conflict(ALREADY_LIKED.to_string()),
            RepoError::ForeignKey(_) => post_not_found(),
            other => other.into(),
        })?;

    tracing::info!(%post_id, user_id = %user.id, "Post liked");

    Ok(HttpResponse::Created().json(LikeResponse {
        user_id: like.user_id,
        post_id: like.post_id,
        created_at: like.created_at,
    }))
}

/// DELETE /posts/{post_id}/likes
pub async fn delete_like(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    ensure_post_exists(&state, post_id).await?;

    state
        .likes
        .delete(user.id, post_id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound("You have not liked this post".to_string()),
            other => other.into(),
        })?;

    tracing::info!(%post_id, user_id = %user.id, "Like removed");

    Ok(HttpResponse::Ok().json(DetailResponse::new("Like deleted successfully")))
}
