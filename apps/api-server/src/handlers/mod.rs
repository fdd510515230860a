//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod likes;
mod posts;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(extractor_errors::json())
        .app_data(extractor_errors::form())
        .app_data(extractor_errors::query())
        .app_data(extractor_errors::path())
        // Public routes
        .route("/", web::get().to(health::home))
        .route("/health", web::get().to(health::health_check))
        // Auth routes
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .service(
            web::scope("/posts")
                .service(
                    web::resource(["", "/"])
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post)),
                )
                // Registered before "/{post_id}" so it is not taken for an id.
                .service(
                    web::resource("/with_likes").route(web::get().to(posts::list_posts_with_likes)),
                )
                .service(
                    web::resource("/{post_id}")
                        .route(web::get().to(posts::read_post))
                        .route(web::put().to(posts::update_post))
                        .route(web::delete().to(posts::delete_post)),
                )
                .service(
                    web::resource("/{post_id}/likes")
                        .route(web::post().to(likes::create_like))
                        .route(web::delete().to(likes::delete_like)),
                ),
        )
        .service(
            web::scope("/comments")
                .service(
                    web::resource(["", "/"])
                        .route(web::get().to(comments::list_comments))
                        .route(web::post().to(comments::create_comment)),
                )
                .service(
                    web::resource("/{comment_id}")
                        .route(web::get().to(comments::read_comment))
                        .route(web::put().to(comments::update_comment))
                        .route(web::delete().to(comments::delete_comment)),
                ),
        );
}

/// Extractor configs that render rejections as RFC 7807 bodies.
mod extractor_errors {
    use actix_web::web;

    use super::AppError;

    pub fn json() -> web::JsonConfig {
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
    }

    pub fn form() -> web::FormConfig {
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
    }

    pub fn query() -> web::QueryConfig {
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
    }

    /// Ids that do not parse name no resource.
    pub fn path() -> web::PathConfig {
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Resource not found".to_string()).into())
    }
}
