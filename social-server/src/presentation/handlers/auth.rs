use crate::application::auth_service::{AuthService, Session};
use crate::application::user_service::UserService;
use crate::domain::error::{DomainError, GetMeError};
use crate::infrastructure::security::JwtKeys;
use crate::presentation::dto::{
    MessageResponse, SessionResponse, SignInEmailRequest, SignInUsernameRequest, SignUpRequest,
};
use crate::presentation::middleware::SessionAuthMiddleware;
use crate::presentation::utils::{AuthenticatedUser, SESSION_COOKIE};
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpResponse, Scope, post, web};
use serde_json::json;
use tracing::info;

pub fn scope(keys: JwtKeys) -> Scope {
    web::scope("/api/auth")
        .service(sign_up_email)
        .service(sign_in_email)
        .service(sign_in_username)
        .service(sign_out)
        .service(
            web::resource("/get-session")
                .wrap(SessionAuthMiddleware::new(keys))
                .route(web::get().to(get_session)),
        )
}

fn session_cookie(token: String, keys: &JwtKeys) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(CookieDuration::seconds(keys.ttl().num_seconds()))
        .finish()
}

fn session_response(session: Session, keys: &JwtKeys) -> HttpResponse {
    let cookie = session_cookie(session.token.clone(), keys);
    HttpResponse::Ok().cookie(cookie).json(SessionResponse {
        token: session.token,
        user: session.user,
    })
}

#[post("/sign-up/email")]
async fn sign_up_email(
    auth: web::Data<AuthService>,
    payload: web::Json<SignUpRequest>,
) -> Result<HttpResponse, DomainError> {
    let SignUpRequest {
        name,
        email,
        password,
        username,
    } = payload.into_inner();
    let session = auth.sign_up(name, email, username, password).await?;

    info!(user_id = %session.user.id, email = %session.user.email, "user signed up");

    Ok(session_response(session, auth.keys()))
}

#[post("/sign-in/email")]
async fn sign_in_email(
    auth: web::Data<AuthService>,
    payload: web::Json<SignInEmailRequest>,
) -> Result<HttpResponse, DomainError> {
    let session = auth
        .sign_in_email(&payload.email, &payload.password)
        .await?;

    info!(user_id = %session.user.id, "user signed in");

    Ok(session_response(session, auth.keys()))
}

#[post("/sign-in/username")]
async fn sign_in_username(
    auth: web::Data<AuthService>,
    payload: web::Json<SignInUsernameRequest>,
) -> Result<HttpResponse, DomainError> {
    let session = auth
        .sign_in_username(&payload.username, &payload.password)
        .await?;

    info!(user_id = %session.user.id, "user signed in");

    Ok(session_response(session, auth.keys()))
}

/// Tokens are stateless, so signing out only drops the cookie.
#[post("/sign-out")]
async fn sign_out() -> HttpResponse {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    HttpResponse::Ok().cookie(cookie).json(MessageResponse {
        message: "Signed out",
    })
}

async fn get_session(
    user: AuthenticatedUser,
    users: web::Data<UserService>,
) -> Result<HttpResponse, GetMeError> {
    let profile = users.get_me(user.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": profile })))
}
