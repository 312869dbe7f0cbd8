use actix_web::dev::Payload;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::middleware::RequestId;

pub const SESSION_COOKIE: &str = "session_token";

/// Identity attached to the request by the session gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: Option<String>,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(DomainError::Unauthorized.into())),
        }
    }
}

/// Picks the session token from `Authorization: Bearer` first, then the cookie.
pub fn session_token(authorization: Option<&str>, cookie: Option<&str>) -> Option<String> {
    authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .or(cookie.filter(|token| !token.is_empty()))
        .map(str::to_owned)
}

pub fn user_from_token(token: &str, keys: &JwtKeys) -> Result<AuthenticatedUser, DomainError> {
    let claims = keys
        .verify_token(token)
        .map_err(|_| DomainError::Unauthorized)?;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| DomainError::Unauthorized)?;

    Ok(AuthenticatedUser {
        id,
        username: claims.username,
    })
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

// Extractor failures answer with the same JSON `{message}` body as every
// other error, without echoing the parser's detail.

pub fn path_error(err: PathError, req: &HttpRequest) -> Error {
    debug!(path = %req.path(), error = %err, "malformed path parameter");
    DomainError::InvalidInput("Invalid path parameter".to_string()).into()
}

pub fn query_error(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!(path = %req.path(), error = %err, "malformed query string");
    DomainError::InvalidInput("Invalid query parameters".to_string()).into()
}

pub fn json_error(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!(path = %req.path(), error = %err, "malformed request body");
    DomainError::InvalidInput("Invalid request body".to_string()).into()
}
