use crate::application::like_service::LikeService;
use crate::domain::error::{DeleteLikeError, GetLikeStatusError, LikePostError};
use crate::presentation::dto::MessageResponse;
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(like_post)
        .service(like_status)
        .service(delete_like);
}

#[post("/on/{post_id}")]
async fn like_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    likes: web::Data<LikeService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, LikePostError> {
    let like = likes.like_post(user.id, path.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        like_id = %like.id,
        post_id = %like.post_id,
        "post liked"
    );

    Ok(HttpResponse::Ok().json(json!({ "like": like })))
}

#[get("/on/{post_id}")]
async fn like_status(
    user: AuthenticatedUser,
    likes: web::Data<LikeService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, GetLikeStatusError> {
    let status = likes.get_like_status(user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[delete("/deletelike/{post_id}")]
async fn delete_like(
    user: AuthenticatedUser,
    likes: web::Data<LikeService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DeleteLikeError> {
    likes.delete_like(user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Like on the given post deleted successfully",
    }))
}
