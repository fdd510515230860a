//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use social_core::domain::{Comment, Like, Post, PostWithLikes, User};
use social_core::error::RepoError;
use social_core::ports::{CommentRepository, LikeRepository, PostRepository, UserRepository};

use super::entity::comment::Entity as CommentEntity;
use super::entity::like::{self, Entity as LikeEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL like repository.
pub type PostgresLikeRepository = PostgresBaseRepository<LikeEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}@{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

/// Row shape of the posts/likes aggregate query.
#[derive(Debug, FromQueryResult)]
struct PostWithLikesRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    content: String,
    created_at: DateTimeWithTimeZone,
    likes_count: i64,
}

impl From<PostWithLikesRow> for PostWithLikes {
    fn from(row: PostWithLikesRow) -> Self {
        Self {
            post: Post {
                id: row.id,
                user_id: row.user_id,
                title: row.title,
                content: row.content,
                created_at: row.created_at.into(),
            },
            likes_count: u64::try_from(row.likes_count).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_with_like_counts(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<PostWithLikes>, RepoError> {
        let rows = PostEntity::find()
            .column_as(
                Expr::col((LikeEntity, like::Column::UserId)).count(),
                "likes_count",
            )
            .join(JoinType::LeftJoin, post::Relation::Like.def())
            .group_by(post::Column::Id)
            .offset(skip)
            .limit(limit)
            .into_model::<PostWithLikesRow>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>, RepoError> {
        let result = LikeEntity::find_by_id((user_id, post_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let result = LikeEntity::insert(like::ActiveModel::from(like))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        let result = LikeEntity::delete_by_id((user_id, post_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
