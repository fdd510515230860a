//! Authentication ports.

use uuid::Uuid;

/// Claims carried by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub issued_at: i64,
    pub exp: i64,
}

/// Issues and verifies signed, time-limited bearer tokens.
pub trait TokenService: Send + Sync {
    /// Generate an access token whose subject is `user_id`.
    fn generate_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Check signature and expiry, then decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Token lifetime in seconds.
    fn expiration_seconds(&self) -> Result<i64, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash. A mismatch is `false`, never an error.
    fn verify(&self, password: &str, hash: &str) -> bool;

    /// Do the work of one `verify` when there is no stored hash to check against.
    fn verify_absent(&self, password: &str);
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Unknown token subject {0}")]
    UnknownSubject(Uuid),

    #[error("Token lifetime of {0} minutes is out of range")]
    LifetimeOutOfRange(i64),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
