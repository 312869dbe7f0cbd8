pub mod comment;
pub mod error;
pub mod like;
pub mod pagination;
pub mod post;
pub mod user;
