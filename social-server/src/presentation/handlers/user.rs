use crate::application::user_service::UserService;
use crate::domain::error::{GetMeError, GetUserError, ListUsersError};
use crate::presentation::dto::{PageQuery, Paginated};
use crate::presentation::utils::AuthenticatedUser;
use actix_web::{HttpResponse, get, web};
use serde_json::json;
use uuid::Uuid;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(me).service(get_all_users).service(get_user);
}

#[get("/me")]
async fn me(
    user: AuthenticatedUser,
    users: web::Data<UserService>,
) -> Result<HttpResponse, GetMeError> {
    let profile = users.get_me(user.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": { "user": profile } })))
}

#[get("/getAllusers")]
async fn get_all_users(
    users: web::Data<UserService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ListUsersError> {
    let page = query.page_request();
    let result = users.list_users(page).await?;
    Ok(HttpResponse::Ok().json(Paginated::new(result, page)))
}

#[get("/{user_id}")]
async fn get_user(
    users: web::Data<UserService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, GetUserError> {
    let user = users.get_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": user })))
}
