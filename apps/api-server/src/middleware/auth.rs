//! Authorization gate: resolves a bearer token to a stored user.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use social_core::domain::User;
use social_core::ports::{AuthError, BaseRepository, TokenService};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The authenticated user making the request.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(CurrentUser(user): CurrentUser) -> impl Responder {
///     format!("Hello, {}!", user.username)
/// }
/// ```
/// Every token failure (missing, malformed, expired, unknown subject) is the
/// same 401 to the caller; the cause is only logged.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim().to_string())
        }
        _ => Err(AuthError::InvalidToken("Expected Bearer token".to_string())),
    }
}

fn reject(cause: AuthError) -> AppError {
    tracing::debug!(%cause, "Rejected credentials");
    AppError::Unauthorized
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                tracing::error!("AppState not found in app data");
                AppError::Internal("Server configuration error".to_string())
            })?;

            let token = token.map_err(reject)?;
            let claims = state.tokens.validate_token(&token).map_err(reject)?;

            let user = state
                .users
                .find_by_id(claims.user_id)
                .await?
                .ok_or_else(|| reject(AuthError::UnknownSubject(claims.user_id)))?;

            Ok(CurrentUser(user))
        })
    }
}
