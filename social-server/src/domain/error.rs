use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Failures raised below the operation layer: the data store, the session
/// provider and request decoding.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("like already exists")]
    LikeAlreadyExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Internal(format!("database error: {}", err))
    }
}

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn message_body(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(MessageBody { message })
}

fn error_body(status: StatusCode, error: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody { error })
}

fn internal(operation: &str, err: &DomainError) -> HttpResponse {
    error!(operation, error = %err, "request failed");
    message_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserAlreadyExists(_) | DomainError::LikeAlreadyExists => {
                StatusCode::CONFLICT
            }
            DomainError::InvalidCredentials | DomainError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            DomainError::UserAlreadyExists(reason) => message_body(self.status_code(), reason),
            DomainError::LikeAlreadyExists => {
                message_body(self.status_code(), "The post is already liked")
            }
            DomainError::InvalidCredentials => {
                message_body(self.status_code(), "Invalid credentials")
            }
            DomainError::Unauthorized => message_body(
                self.status_code(),
                "Unauthorized: session not found or expired",
            ),
            DomainError::InvalidInput(reason) => message_body(self.status_code(), reason),
            DomainError::Internal(_) => internal("request", self),
        }
    }
}

// ======================= USERS =======================

#[derive(Debug, Error)]
pub enum GetMeError {
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for GetMeError {
    fn status_code(&self) -> StatusCode {
        match self {
            GetMeError::UserNotFound => StatusCode::BAD_REQUEST,
            GetMeError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            GetMeError::UserNotFound => error_body(self.status_code(), "User not found"),
            GetMeError::Store(err) => internal("get_me", err),
        }
    }
}

#[derive(Debug, Error)]
pub enum ListUsersError {
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for ListUsersError {
    fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }

    fn error_response(&self) -> HttpResponse {
        let ListUsersError::Store(err) = self;
        error!(operation = "list_users", error = %err, "request failed");
        message_body(self.status_code(), "Unable to fetch users")
    }
}

#[derive(Debug, Error)]
pub enum GetUserError {
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for GetUserError {
    fn status_code(&self) -> StatusCode {
        match self {
            GetUserError::UserNotFound => StatusCode::NOT_FOUND,
            GetUserError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            GetUserError::UserNotFound => error_body(self.status_code(), "User not found"),
            GetUserError::Store(err) => internal("get_user", err),
        }
    }
}

// ======================= POSTS =======================

#[derive(Debug, Error)]
pub enum CreatePostError {
    #[error("title and content are required")]
    BadRequest,
    #[error("caller does not exist")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for CreatePostError {
    fn status_code(&self) -> StatusCode {
        match self {
            CreatePostError::BadRequest => StatusCode::BAD_REQUEST,
            CreatePostError::Unauthorized => StatusCode::UNAUTHORIZED,
            CreatePostError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            CreatePostError::BadRequest => {
                message_body(self.status_code(), "Title and content are required")
            }
            CreatePostError::Unauthorized => {
                message_body(self.status_code(), "User is not authorized")
            }
            CreatePostError::Store(err) => internal("create_post", err),
        }
    }
}

#[derive(Debug, Error)]
pub enum GetPostError {
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for GetPostError {
    fn status_code(&self) -> StatusCode {
        match self {
            GetPostError::NotFound => StatusCode::BAD_REQUEST,
            GetPostError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            GetPostError::NotFound => {
                message_body(self.status_code(), "Post with given id does not exist")
            }
            GetPostError::Store(err) => internal("get_post", err),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeletePostError {
    #[error("caller does not exist")]
    Unauthorized,
    #[error("post not found")]
    NotFound,
    #[error("post belongs to another user")]
    NotOwner,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for DeletePostError {
    fn status_code(&self) -> StatusCode {
        match self {
            DeletePostError::Unauthorized | DeletePostError::NotFound => StatusCode::BAD_REQUEST,
            DeletePostError::NotOwner => StatusCode::FORBIDDEN,
            DeletePostError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            DeletePostError::Unauthorized => message_body(self.status_code(), "User is not found"),
            DeletePostError::NotFound => message_body(self.status_code(), "Post is not found"),
            DeletePostError::NotOwner => {
                message_body(self.status_code(), "You can only delete your own posts")
            }
            DeletePostError::Store(err) => internal("delete_post", err),
        }
    }
}

// ======================= COMMENTS =======================

#[derive(Debug, Error)]
pub enum CommentPostError {
    #[error("caller does not exist")]
    Unauthorized,
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for CommentPostError {
    fn status_code(&self) -> StatusCode {
        match self {
            CommentPostError::Unauthorized => StatusCode::BAD_REQUEST,
            CommentPostError::NotFound => StatusCode::NOT_FOUND,
            CommentPostError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            CommentPostError::Unauthorized => {
                message_body(self.status_code(), "User with the token is not found")
            }
            CommentPostError::NotFound => {
                message_body(self.status_code(), "Post with given id is not found")
            }
            CommentPostError::Store(err) => internal("comment_post", err),
        }
    }
}

#[derive(Debug, Error)]
pub enum GetCommentPostError {
    #[error("caller does not exist")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for GetCommentPostError {
    fn status_code(&self) -> StatusCode {
        match self {
            GetCommentPostError::Unauthorized => StatusCode::BAD_REQUEST,
            GetCommentPostError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            GetCommentPostError::Unauthorized => {
                message_body(self.status_code(), "User with the given token is not present")
            }
            GetCommentPostError::Store(err) => internal("get_comment_posts", err),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeleteCommentError {
    #[error("caller does not exist")]
    Unauthorized,
    #[error("comment not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for DeleteCommentError {
    fn status_code(&self) -> StatusCode {
        match self {
            DeleteCommentError::Unauthorized => StatusCode::BAD_REQUEST,
            DeleteCommentError::NotFound => StatusCode::NOT_FOUND,
            DeleteCommentError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            DeleteCommentError::Unauthorized => {
                message_body(self.status_code(), "User with the token does not exist")
            }
            DeleteCommentError::NotFound => {
                message_body(self.status_code(), "Comment with given id not found")
            }
            DeleteCommentError::Store(err) => internal("delete_comment", err),
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateCommentError {
    #[error("caller does not exist")]
    Unauthorized,
    #[error("comment not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for UpdateCommentError {
    fn status_code(&self) -> StatusCode {
        match self {
            UpdateCommentError::Unauthorized | UpdateCommentError::NotFound => {
                StatusCode::BAD_REQUEST
            }
            UpdateCommentError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            UpdateCommentError::Unauthorized => {
                message_body(self.status_code(), "User with given token is not found")
            }
            UpdateCommentError::NotFound => {
                message_body(self.status_code(), "Comment with given id not found")
            }
            UpdateCommentError::Store(err) => internal("update_comment", err),
        }
    }
}

#[derive(Debug, Error)]
pub enum GetAllCommentsError {
    #[error("caller does not exist")]
    Unauthorized,
    #[error("no comments found")]
    BadRequest,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for GetAllCommentsError {
    fn status_code(&self) -> StatusCode {
        match self {
            GetAllCommentsError::Unauthorized => StatusCode::UNAUTHORIZED,
            GetAllCommentsError::BadRequest => StatusCode::BAD_REQUEST,
            GetAllCommentsError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            GetAllCommentsError::Unauthorized => message_body(self.status_code(), "Unauthorized"),
            GetAllCommentsError::BadRequest => message_body(self.status_code(), "No comments found"),
            GetAllCommentsError::Store(err) => internal("get_all_comments", err),
        }
    }
}

// ======================= LIKES =======================

#[derive(Debug, Error)]
pub enum LikePostError {
    #[error("caller does not exist")]
    Unauthorized,
    #[error("post not found")]
    NotFound,
    #[error("post already liked")]
    AlreadyLiked,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for LikePostError {
    fn status_code(&self) -> StatusCode {
        match self {
            LikePostError::Unauthorized | LikePostError::AlreadyLiked => StatusCode::BAD_REQUEST,
            LikePostError::NotFound => StatusCode::NOT_FOUND,
            LikePostError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            LikePostError::Unauthorized => {
                message_body(self.status_code(), "User with the token is not found")
            }
            LikePostError::NotFound => {
                message_body(self.status_code(), "Post with given id is not found")
            }
            LikePostError::AlreadyLiked => {
                message_body(self.status_code(), "The post is already liked")
            }
            LikePostError::Store(err) => internal("like_post", err),
        }
    }
}

#[derive(Debug, Error)]
pub enum GetLikeStatusError {
    #[error("caller does not exist")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for GetLikeStatusError {
    fn status_code(&self) -> StatusCode {
        match self {
            GetLikeStatusError::Unauthorized => StatusCode::BAD_REQUEST,
            GetLikeStatusError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            GetLikeStatusError::Unauthorized => message_body(self.status_code(), "User unauthorized"),
            GetLikeStatusError::Store(err) => internal("get_like_status", err),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeleteLikeError {
    #[error("caller does not exist")]
    Unauthorized,
    #[error("post not found")]
    NotFound,
    #[error("like not found")]
    LikeNotFound,
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl ResponseError for DeleteLikeError {
    fn status_code(&self) -> StatusCode {
        match self {
            DeleteLikeError::Unauthorized
            | DeleteLikeError::NotFound
            | DeleteLikeError::LikeNotFound => StatusCode::BAD_REQUEST,
            DeleteLikeError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            DeleteLikeError::Unauthorized => message_body(self.status_code(), "User is not found"),
            DeleteLikeError::NotFound => message_body(self.status_code(), "Post is not found"),
            DeleteLikeError::LikeNotFound => {
                message_body(self.status_code(), "Like on the post is not found")
            }
            DeleteLikeError::Store(err) => internal("delete_like", err),
        }
    }
}
