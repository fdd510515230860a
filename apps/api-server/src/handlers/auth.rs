//! Registration and login handlers.

use actix_web::{HttpResponse, web};

use social_core::domain::User;
use social_core::error::RepoError;
use social_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use social_shared::dto::{AuthResponse, LoginForm, RegisterUserRequest, UserResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Single message for every login failure so callers cannot probe for usernames.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
    }
}

fn validate_registration(req: &RegisterUserRequest) -> AppResult<()> {
    if req.username.trim().is_empty() {
        return Err(AppError::BadRequest("Username must not be empty".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.is_empty() {
        return Err(AppError::BadRequest("Password must not be empty".to_string()));
    }
    Ok(())
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate_registration(&req)?;

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already registered".to_string()));
    }
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    // A concurrent registration can still slip past the checks above.
    let user = state
        .users
        .insert(User::new(req.username, req.email, password_hash))
        .await
        .map_err(|e| match e {
            RepoError::Constraint(_) => {
                AppError::Conflict("Username or email already registered".to_string())
            }
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Ok().json(user_response(user)))
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let user = match state.users.find_by_username(&form.username).await? {
        Some(user) if state.passwords.verify(&form.password, &user.password_hash) => user,
        Some(_) => return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string())),
        None => {
            // Unknown usernames pay for a hash too, so timing matches a wrong password.
            state.passwords.verify_absent(&form.password);
            return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
        }
    };

    let token = state
        .tokens
        .generate_token(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let expires_in = state
        .tokens
        .expiration_seconds()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        expires_in: u64::try_from(expires_in).unwrap_or_default(),
    }))
}
