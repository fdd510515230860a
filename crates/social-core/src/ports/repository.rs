use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Like, Post, PostWithLikes, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique violations surface as `RepoError::Constraint`,
    /// a missing parent row as `RepoError::ForeignKey`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository. Deleting a post also removes its comments and likes.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// A page of posts in store order.
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// A page of posts, each paired with its like count.
    async fn list_with_like_counts(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<PostWithLikes>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Comment>, RepoError>;
}

/// Like repository. Likes are keyed by `(user_id, post_id)`.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>, RepoError>;

    /// Insert a like. A second like for the same pair is `RepoError::Constraint`.
    async fn insert(&self, like: Like) -> Result<Like, RepoError>;

    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError>;
}
