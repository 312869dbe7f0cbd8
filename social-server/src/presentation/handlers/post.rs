use crate::application::post_service::PostService;
use crate::domain::error::{CreatePostError, DeletePostError, DomainError, GetPostError};
use crate::domain::pagination::PageRequest;
use crate::domain::post::NewPost;
use crate::presentation::dto::{
    CreatePostRequest, MessageResponse, PageQuery, Paginated, PastPostsQuery, SearchQuery,
};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_post)
        .service(delete_post)
        .service(get_post)
        .service(past_posts)
        .service(get_all_posts)
        .service(my_posts)
        .service(posts_by_user)
        .service(search_posts);
}

#[post("/create-post")]
async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, CreatePostError> {
    let payload = payload.into_inner();
    let post = posts
        .create_post(
            user.id,
            NewPost {
                title: payload.title,
                content: payload.content,
            },
        )
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Ok().json(json!({ "data": { "post": post } })))
}

#[delete("/deletepost/{post_id}")]
async fn delete_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DeletePostError> {
    let post_id = path.into_inner();
    posts.delete_post(user.id, post_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Post deleted successfully",
    }))
}

#[get("/getpost/{post_id}")]
async fn get_post(
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, GetPostError> {
    let post = posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": post })))
}

#[get("/pastposts")]
async fn past_posts(
    posts: web::Data<PostService>,
    query: web::Query<PastPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let before = match query.before.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                DomainError::InvalidInput("before must be an RFC 3339 timestamp".to_string())
            })?,
        None => Utc::now(),
    };
    let page = PageRequest::new(query.page, query.limit);
    let result = posts.list_before(before, page).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(result, page)))
}

#[get("/getAllposts")]
async fn get_all_posts(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = query.page_request();
    let result = posts.list_feed(user.id, page).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(result, page)))
}

#[get("/mine")]
async fn my_posts(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = query.page_request();
    let result = posts.list_mine(user.id, page).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(result, page)))
}

#[get("/byUser/{user_id}")]
async fn posts_by_user(
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = query.page_request();
    let result = posts.list_by_user(path.into_inner(), page).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(result, page)))
}

#[get("/search")]
async fn search_posts(
    posts: web::Data<PostService>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = PageRequest::new(query.page, query.limit);
    let result = posts.search(&query.q, page).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(result, page)))
}
