use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use social_core::domain::{Comment, Like, Post, PostWithLikes, User};
use social_core::error::RepoError;
use social_core::ports::{
    BaseRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
}

impl Tables {
    fn remove_post(&mut self, post_id: Uuid) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id != post_id);
        if self.posts.len() == before {
            return false;
        }
        self.comments.retain(|c| c.post_id != post_id);
        self.likes.retain(|l| l.post_id != post_id);
        true
    }
}

/// Shared in-memory tables guarded by an async RwLock.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository { db: self.clone() }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository { db: self.clone() }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository { db: self.clone() }
    }

    pub fn likes(&self) -> InMemoryLikeRepository {
        InMemoryLikeRepository { db: self.clone() }
    }
}

fn page<T: Clone>(rows: &[T], skip: u64, limit: u64) -> Vec<T> {
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    rows.iter().skip(skip).take(limit).cloned().collect()
}

pub struct InMemoryUserRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.db.tables.write().await;

        if tables.users.iter().any(|u| u.id == user.id) {
            return Err(RepoError::Constraint("users_pkey".to_string()));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("users_username_key".to_string()));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }

        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.db.tables.write().await;

        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && (u.username == user.username || u.email == user.email))
        {
            return Err(RepoError::Constraint("users unique key".to_string()));
        }

        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;

        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(RepoError::NotFound);
        }

        let owned: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|c| c.user_id != id);
        tables.likes.retain(|l| l.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

pub struct InMemoryPostRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.db.tables.write().await;

        if !tables.users.iter().any(|u| u.id == post.user_id) {
            return Err(RepoError::ForeignKey("posts_user_id_fkey".to_string()));
        }
        if tables.posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }

        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.db.tables.write().await;

        let slot = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;

        if tables.remove_post(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(page(&tables.posts, skip, limit))
    }

    async fn list_with_like_counts(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<PostWithLikes>, RepoError> {
        let tables = self.db.tables.read().await;

        Ok(page(&tables.posts, skip, limit)
            .into_iter()
            .map(|post| {
                let likes_count = tables.likes.iter().filter(|l| l.post_id == post.id).count();
                PostWithLikes {
                    post,
                    likes_count: likes_count as u64,
                }
            })
            .collect())
    }
}

pub struct InMemoryCommentRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.db.tables.write().await;

        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(RepoError::ForeignKey("comments_post_id_fkey".to_string()));
        }
        if !tables.users.iter().any(|u| u.id == comment.user_id) {
            return Err(RepoError::ForeignKey("comments_user_id_fkey".to_string()));
        }
        if tables.comments.iter().any(|c| c.id == comment.id) {
            return Err(RepoError::Constraint("comments_pkey".to_string()));
        }

        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.db.tables.write().await;

        let slot = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;

        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(page(&tables.comments, skip, limit))
    }
}

pub struct InMemoryLikeRepository {
    db: InMemoryDatabase,
}

#[async_trait]
impl LikeRepository for InMemoryLikeRepository {
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>, RepoError> {
        let tables = self.db.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.post_id == post_id)
            .cloned())
    }

    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let mut tables = self.db.tables.write().await;

        if !tables.posts.iter().any(|p| p.id == like.post_id) {
            return Err(RepoError::ForeignKey("likes_post_id_fkey".to_string()));
        }
        if !tables.users.iter().any(|u| u.id == like.user_id) {
            return Err(RepoError::ForeignKey("likes_user_id_fkey".to_string()));
        }
        if tables
            .likes
            .iter()
            .any(|l| l.user_id == like.user_id && l.post_id == like.post_id)
        {
            return Err(RepoError::Constraint("likes_pkey".to_string()));
        }

        tables.likes.push(like.clone());
        Ok(like)
    }

    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.db.tables.write().await;

        let before = tables.likes.len();
        tables
            .likes
            .retain(|l| !(l.user_id == user_id && l.post_id == post_id));
        if tables.likes.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(db: &InMemoryDatabase, username: &str) -> User {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "hash".to_string(),
        );
        db.users().insert(user).await.unwrap()
    }

    #[tokio::test]
    async fn test_username_and_email_are_unique() {
        let db = InMemoryDatabase::new();
        seed_user(&db, "alice").await;

        let same_name = User::new(
            "alice".to_string(),
            "other@example.com".to_string(),
            "hash".to_string(),
        );
        let same_email = User::new(
            "bob".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );

        assert!(matches!(
            db.users().insert(same_name).await,
            Err(RepoError::Constraint(_))
        ));
        assert!(matches!(
            db.users().insert(same_email).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_like_violates_key() {
        let db = InMemoryDatabase::new();
        let alice = seed_user(&db, "alice").await;
        let post = db
            .posts()
            .insert(Post::new(alice.id, "t".to_string(), "c".to_string()))
            .await
            .unwrap();

        let likes = db.likes();
        likes.insert(Like::new(alice.id, post.id)).await.unwrap();

        assert!(matches!(
            likes.insert(Like::new(alice.id, post.id)).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_likes_store_one_row() {
        let db = InMemoryDatabase::new();
        let alice = seed_user(&db, "alice").await;
        let post = db
            .posts()
            .insert(Post::new(alice.id, "t".to_string(), "c".to_string()))
            .await
            .unwrap();

        let (left, right) = (db.likes(), db.likes());
        let (first, second) = tokio::join!(
            left.insert(Like::new(alice.id, post.id)),
            right.insert(Like::new(alice.id, post.id)),
        );

        assert!(first.is_ok() != second.is_ok());
        let counted = db.posts().list_with_like_counts(0, 10).await.unwrap();
        assert_eq!(counted[0].likes_count, 1);
    }

    #[tokio::test]
    async fn test_deleting_post_cascades() {
        let db = InMemoryDatabase::new();
        let alice = seed_user(&db, "alice").await;
        let bob = seed_user(&db, "bob").await;
        let post = db
            .posts()
            .insert(Post::new(alice.id, "t".to_string(), "c".to_string()))
            .await
            .unwrap();
        let comment = db
            .comments()
            .insert(Comment::new(post.id, bob.id, "nice".to_string()))
            .await
            .unwrap();
        db.likes().insert(Like::new(bob.id, post.id)).await.unwrap();

        db.posts().delete(post.id).await.unwrap();

        assert!(db.comments().find_by_id(comment.id).await.unwrap().is_none());
        assert!(db.likes().find(bob.id, post.id).await.unwrap().is_none());
        assert!(matches!(
            db.posts().delete(post.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_pagination_and_like_counts() {
        let db = InMemoryDatabase::new();
        let alice = seed_user(&db, "alice").await;
        let posts = db.posts();
        let mut ids = Vec::new();
        for i in 0..5 {
            let post = posts
                .insert(Post::new(alice.id, format!("t{i}"), "c".to_string()))
                .await
                .unwrap();
            ids.push(post.id);
        }
        db.likes().insert(Like::new(alice.id, ids[1])).await.unwrap();

        let page = posts.list(1, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, ids[1]);
        assert_eq!(page[1].id, ids[2]);

        let counted = posts.list_with_like_counts(1, 2).await.unwrap();
        assert_eq!(counted[0].likes_count, 1);
        assert_eq!(counted[1].likes_count, 0);

        assert!(posts.list(10, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_update_keeps_keys_unique() {
        let db = InMemoryDatabase::new();
        let alice = seed_user(&db, "alice").await;
        let bob = seed_user(&db, "bob").await;
        let users = db.users();

        let renamed = User {
            username: "alicia".to_string(),
            ..alice.clone()
        };
        let updated = users.update(renamed).await.unwrap();
        assert_eq!(updated.username, "alicia");
        assert!(users.find_by_username("alice").await.unwrap().is_none());

        let clash = User {
            email: alice.email.clone(),
            ..bob
        };
        assert!(matches!(
            users.update(clash).await,
            Err(RepoError::Constraint(_))
        ));

        let unknown = User::new(
            "ghost".to_string(),
            "ghost@example.com".to_string(),
            "hash".to_string(),
        );
        assert!(matches!(users.update(unknown).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let db = InMemoryDatabase::new();
        let alice = seed_user(&db, "alice").await;
        let bob = seed_user(&db, "bob").await;

        let alice_post = db
            .posts()
            .insert(Post::new(alice.id, "mine".to_string(), "c".to_string()))
            .await
            .unwrap();
        let bob_post = db
            .posts()
            .insert(Post::new(bob.id, "theirs".to_string(), "c".to_string()))
            .await
            .unwrap();
        let on_alice_post = db
            .comments()
            .insert(Comment::new(alice_post.id, bob.id, "by bob".to_string()))
            .await
            .unwrap();
        let by_alice = db
            .comments()
            .insert(Comment::new(bob_post.id, alice.id, "by alice".to_string()))
            .await
            .unwrap();
        db.likes().insert(Like::new(alice.id, bob_post.id)).await.unwrap();
        db.likes().insert(Like::new(bob.id, alice_post.id)).await.unwrap();

        db.users().delete(alice.id).await.unwrap();

        assert!(db.users().find_by_id(alice.id).await.unwrap().is_none());
        assert!(db.posts().find_by_id(alice_post.id).await.unwrap().is_none());
        assert!(db.comments().find_by_id(on_alice_post.id).await.unwrap().is_none());
        assert!(db.comments().find_by_id(by_alice.id).await.unwrap().is_none());
        assert!(db.likes().find(alice.id, bob_post.id).await.unwrap().is_none());
        assert!(db.likes().find(bob.id, alice_post.id).await.unwrap().is_none());

        // Bob's own post survives.
        assert!(db.posts().find_by_id(bob_post.id).await.unwrap().is_some());
        assert!(matches!(
            db.users().delete(alice.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_like_requires_existing_post_and_user() {
        let db = InMemoryDatabase::new();
        let alice = seed_user(&db, "alice").await;
        let post = db
            .posts()
            .insert(Post::new(alice.id, "t".to_string(), "c".to_string()))
            .await
            .unwrap();

        assert!(matches!(
            db.likes().insert(Like::new(alice.id, Uuid::new_v4())).await,
            Err(RepoError::ForeignKey(_))
        ));
        assert!(matches!(
            db.likes().insert(Like::new(Uuid::new_v4(), post.id)).await,
            Err(RepoError::ForeignKey(_))
        ));
    }

    #[tokio::test]
    async fn test_comment_requires_existing_post() {
        let db = InMemoryDatabase::new();
        let alice = seed_user(&db, "alice").await;

        let orphan = Comment::new(Uuid::new_v4(), alice.id, "hello".to_string());

        assert!(matches!(
            db.comments().insert(orphan).await,
            Err(RepoError::ForeignKey(_))
        ));
    }
}
