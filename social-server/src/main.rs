mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer};
use anyhow::Context;
use application::auth_service::AuthService;
use application::comment_service::CommentService;
use application::like_service::LikeService;
use application::post_service::PostService;
use application::user_service::UserService;
use data::comment_repository::{CommentRepository, PostgresCommentRepository};
use data::like_repository::{LikeRepository, PostgresLikeRepository};
use data::post_repository::{PostRepository, PostgresPostRepository};
use data::user_repository::{PostgresUserRepository, UserRepository};
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;
use presentation::middleware::RequestLogMiddleware;
use presentation::routes::{self, Services};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let posts: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(pool.clone()));
    let comments: Arc<dyn CommentRepository> =
        Arc::new(PostgresCommentRepository::new(pool.clone()));
    let likes: Arc<dyn LikeRepository> = Arc::new(PostgresLikeRepository::new(pool));

    let keys = JwtKeys::new(config.auth_secret.clone(), config.session_ttl);
    let services = Services {
        auth: AuthService::new(Arc::clone(&users), keys),
        users: UserService::new(Arc::clone(&users)),
        posts: PostService::new(Arc::clone(&users), Arc::clone(&posts)),
        comments: CommentService::new(Arc::clone(&users), Arc::clone(&posts), comments),
        likes: LikeService::new(users, posts, likes),
    };

    info!(server_url = %config.server_url, "starting server");

    let config_data = config.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(build_cors(&config_data))
            .configure(|cfg| routes::configure(cfg, &services))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    Cors::default()
        .allowed_origin(&config.web_client_url)
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .supports_credentials()
        .max_age(600)
}
