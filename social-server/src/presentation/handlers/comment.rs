use crate::application::comment_service::CommentService;
use crate::domain::error::{
    CommentPostError, DeleteCommentError, DomainError, GetAllCommentsError, GetCommentPostError,
    UpdateCommentError,
};
use crate::presentation::dto::{CommentRequest, MessageResponse, PageQuery, Paginated};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(comment_post)
        .service(get_comment_posts)
        .service(get_all_comments)
        .service(comments_by_user)
        .service(delete_comment)
        .service(update_comment);
}

#[post("/on/{post_id}")]
async fn comment_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, CommentPostError> {
    let comment = comments
        .comment_post(user.id, path.into_inner(), payload.into_inner().content)
        .await?;

    info!(
        request_id = %request_id(&req),
        comment_id = %comment.id,
        post_id = %comment.post_id,
        "comment created"
    );

    Ok(HttpResponse::Ok().json(json!({ "comment": comment })))
}

#[get("/on/{post_id}")]
async fn get_comment_posts(
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, GetCommentPostError> {
    let page = query.page_request();
    let result = comments
        .get_comment_posts(user.id, path.into_inner(), page)
        .await?;
    Ok(HttpResponse::Ok().json(Paginated::new(result, page)))
}

#[get("/all")]
async fn get_all_comments(
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, GetAllCommentsError> {
    let page = query.page_request();
    let result = comments.get_all_comments(user.id, page).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(result, page)))
}

#[get("/byUser/{user_id}")]
async fn comments_by_user(
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = query.page_request();
    let result = comments
        .get_comments_by_user(path.into_inner(), page)
        .await?;
    Ok(HttpResponse::Ok().json(Paginated::new(result, page)))
}

#[delete("/{comment_id}")]
async fn delete_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DeleteCommentError> {
    let comment_id = path.into_inner();
    comments.delete_comment(user.id, comment_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        comment_id = %comment_id,
        "comment deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Comment deleted successfully",
    }))
}

#[patch("/{comment_id}")]
async fn update_comment(
    user: AuthenticatedUser,
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, UpdateCommentError> {
    let comment = comments
        .update_comment(user.id, path.into_inner(), payload.into_inner().content)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "comment": comment })))
}

#[cfg(test)]
mod tests {
    use crate::presentation::routes::{configure, test_support::TestContext};
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn comment_lifecycle() {
        let ctx = TestContext::new();
        let (_, auth) = ctx.user("Una");
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.services))).await;

        let req = test::TestRequest::post()
            .uri("/posts/create-post")
            .insert_header(("Authorization", auth.clone()))
            .set_json(json!({ "title": "A", "content": "B" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let post_id = body["data"]["post"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/comments/on/{}", post_id))
            .insert_header(("Authorization", auth.clone()))
            .set_json(json!({ "content": "hello" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["comment"]["postId"], post_id);
        let comment_id = body["comment"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::patch()
            .uri(&format!("/comments/{}", comment_id))
            .insert_header(("Authorization", auth.clone()))
            .set_json(json!({ "content": "edited" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["comment"]["content"], "edited");
        assert_eq!(body["comment"]["id"], comment_id);

        let req = test::TestRequest::get()
            .uri(&format!("/comments/on/{}", post_id))
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["content"], "edited");
        assert_eq!(body["pagination"]["total"], 1);

        let req = test::TestRequest::get()
            .uri("/comments/all")
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["user"]["name"], "Una");
        assert_eq!(body["data"][0]["post"]["title"], "A");

        let req = test::TestRequest::delete()
            .uri(&format!("/comments/{}", comment_id))
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Comment deleted successfully");

        let req = test::TestRequest::delete()
            .uri(&format!("/comments/{}", comment_id))
            .insert_header(("Authorization", auth))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn commenting_on_missing_post_is_404() {
        let ctx = TestContext::new();
        let (_, auth) = ctx.user("Una");
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.services))).await;

        let req = test::TestRequest::post()
            .uri(&format!("/comments/on/{}", uuid::Uuid::new_v4()))
            .insert_header(("Authorization", auth))
            .set_json(json!({ "content": "hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Post with given id is not found");
    }

    #[actix_web::test]
    async fn empty_global_listing_is_400() {
        let ctx = TestContext::new();
        let (_, auth) = ctx.user("Una");
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.services))).await;

        let req = test::TestRequest::get()
            .uri("/comments/all")
            .insert_header(("Authorization", auth))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "No comments found");
    }

    #[actix_web::test]
    async fn user_comments_are_paginated_with_their_post() {
        let ctx = TestContext::new();
        let (una, una_auth) = ctx.user("Una");
        let (_, vic_auth) = ctx.user("Vic");
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.services))).await;

        let req = test::TestRequest::post()
            .uri("/posts/create-post")
            .insert_header(("Authorization", una_auth.clone()))
            .set_json(json!({ "title": "Rust tips", "content": "B" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let post_id = body["data"]["post"]["id"].as_str().unwrap().to_string();

        for (auth, content) in [
            (&una_auth, "first"),
            (&una_auth, "second"),
            (&vic_auth, "not mine"),
        ] {
            let req = test::TestRequest::post()
                .uri(&format!("/comments/on/{}", post_id))
                .insert_header(("Authorization", auth.clone()))
                .set_json(json!({ "content": content }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/comments/byUser/{}?limit=1", una.id))
            .insert_header(("Authorization", vic_auth))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body["pagination"],
            json!({ "page": 1, "limit": 1, "total": 2, "totalPages": 2 })
        );
        let comment = &body["data"][0];
        assert_eq!(comment["content"], "second");
        assert_eq!(comment["userId"], una.id.to_string());
        assert_eq!(
            comment["post"],
            json!({ "id": post_id, "title": "Rust tips" })
        );
    }
}
