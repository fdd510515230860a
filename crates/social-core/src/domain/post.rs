use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a piece of content owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(user_id: Uuid, title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            created_at: Utc::now(),
        }
    }

    /// Whether `user_id` is the author of this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Overwrite the editable fields.
    pub fn edit(&mut self, title: String, content: String) {
        self.title = title;
        self.content = content;
    }
}

/// A post together with the number of likes it has received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithLikes {
    pub post: Post,
    pub likes_count: u64,
}
