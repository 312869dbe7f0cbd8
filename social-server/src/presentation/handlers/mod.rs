pub mod auth;
pub mod comment;
pub mod health;
pub mod like;
pub mod post;
pub mod user;
