//! Post CRUD handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use social_core::domain::Post;
use social_core::ports::{BaseRepository, PostRepository};
use social_shared::DetailResponse;
use social_shared::dto::{Pagination, PostRequest, PostResponse};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        user_id: post.user_id,
        created_at: post.created_at,
    }
}

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}

/// Load a post the current user is about to change.
async fn find_owned_post(
    state: &AppState,
    post_id: Uuid,
    actor: Uuid,
    action: &str,
) -> AppResult<Post> {
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(post_not_found)?;

    if !post.is_owned_by(actor) {
        tracing::debug!(%post_id, %actor, "Rejected {action} by non-owner");
        return Err(AppError::Forbidden(format!(
            "Not authorized to {action} this post"
        )));
    }

    Ok(post)
}

/// POST /posts/
pub async fn create_post(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .insert(Post::new(user.id, req.title, req.content))
        .await?;

    tracing::info!(post_id = %post.id, user_id = %user.id, "Post created");

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// GET /posts/{post_id}
pub async fn read_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(post_not_found)?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// GET /posts/
pub async fn list_posts(
    state: web::Data<AppState>,
    page: web::Query<Pagination>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list(page.skip, page.limit).await?;

    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/with_likes
///
/// The store pairs every post with its like count; the response carries
/// the posts only.
pub async fn list_posts_with_likes(
    state: web::Data<AppState>,
    page: web::Query<Pagination>,
) -> AppResult<HttpResponse> {
    let rows = state
        .posts
        .list_with_like_counts(page.skip, page.limit)
        .await?;

    let body: Vec<PostResponse> = rows.into_iter().map(|row| post_response(row.post)).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PUT /posts/{post_id}
pub async fn update_post(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut post = find_owned_post(&state, path.into_inner(), user.id, "update").await?;

    post.edit(req.title, req.content);
    let post = state.posts.update(post).await?;

    tracing::info!(post_id = %post.id, "Post updated");

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = find_owned_post(&state, path.into_inner(), user.id, "delete").await?;

    state.posts.delete(post.id).await?;

    tracing::info!(post_id = %post.id, "Post deleted");

    Ok(HttpResponse::Ok().json(DetailResponse::new("Post deleted successfully")))
}
