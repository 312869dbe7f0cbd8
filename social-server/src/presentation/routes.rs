use actix_web::web;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::like_service::LikeService;
use crate::application::post_service::PostService;
use crate::application::user_service::UserService;
use crate::presentation::handlers;
use crate::presentation::middleware::SessionAuthMiddleware;
use crate::presentation::utils::{json_error, path_error, query_error};

/// Every service the HTTP layer dispatches to.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
}

/// Mounts `/health`, `/api/auth` and the session-gated entity routers.
pub fn configure(cfg: &mut web::ServiceConfig, services: &Services) {
    let keys = services.auth.keys().clone();

    cfg.app_data(web::Data::new(services.auth.clone()))
        .app_data(web::Data::new(services.users.clone()))
        .app_data(web::Data::new(services.posts.clone()))
        .app_data(web::Data::new(services.comments.clone()))
        .app_data(web::Data::new(services.likes.clone()))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .service(handlers::health::health)
        .service(handlers::auth::scope(keys.clone()))
        .service(
            web::scope("/users")
                .wrap(SessionAuthMiddleware::new(keys.clone()))
                .configure(handlers::user::routes),
        )
        .service(
            web::scope("/posts")
                .wrap(SessionAuthMiddleware::new(keys.clone()))
                .configure(handlers::post::routes),
        )
        .service(
            web::scope("/likes")
                .wrap(SessionAuthMiddleware::new(keys.clone()))
                .configure(handlers::like::routes),
        )
        .service(
            web::scope("/comments")
                .wrap(SessionAuthMiddleware::new(keys))
                .configure(handlers::comment::routes),
        );
}
