//! Application state - shared across all handlers.

use std::sync::Arc;

use social_core::ports::{
    CommentRepository, LikeRepository, PasswordService, PostRepository, TokenService,
    UserRepository,
};
use social_infra::{Argon2PasswordService, InMemoryDatabase, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
use social_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresLikeRepository,
    PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Errors raised while building the state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("database initialization failed: {0}")]
    Database(String),
}

/// Shared application state.
///
/// Every handle is a trait object so the same handlers run on PostgreSQL
/// and on the in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// A configured but unreachable database is an error; no database at all
    /// falls back to the in-memory store.
    pub async fn new(config: &AppConfig) -> Result<Self, StateError> {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                let connections = DatabaseConnections::init(db_config)
                    .await
                    .map_err(|e| StateError::Database(e.to_string()))?;
                let conn = connections.main;

                tracing::info!("Application state initialized (postgres)");
                return Ok(Self {
                    users: Arc::new(PostgresUserRepository::new(conn.clone())),
                    posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                    comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
                    likes: Arc::new(PostgresLikeRepository::new(conn)),
                    tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
                    passwords: Arc::new(Argon2PasswordService::new()),
                });
            }
        }

        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        Ok(Self::in_memory(config.jwt.clone()))
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        let db = InMemoryDatabase::new();

        Self {
            users: Arc::new(db.users()),
            posts: Arc::new(db.posts()),
            comments: Arc::new(db.comments()),
            likes: Arc::new(db.likes()),
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}
