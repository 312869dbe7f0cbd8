pub mod comment_repository;
pub mod like_repository;
#[cfg(test)]
pub mod memory;
pub mod post_repository;
pub mod user_repository;
