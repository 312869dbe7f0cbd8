//! In-memory data store backing the service and handler tests.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::comment::{
    Comment, CommentAuthor, CommentWithContext, CommentWithPost, CommentedPost,
};
use crate::domain::error::DomainError;
use crate::domain::like::Like;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::post::{FeedPost, NewPost, Post, SortOrder};
use crate::domain::user::{NewUser, User, UserCredentials, UserSummary};

#[derive(Default)]
struct State {
    ticks: i64,
    users: Vec<(User, String)>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
}

impl State {
    /// Strictly increasing timestamps, one second apart.
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(self.ticks)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

fn lock_poisoned<T>(_: T) -> DomainError {
    DomainError::Internal("lock poisoned".to_string())
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user directly, the way the session provider would.
    pub fn insert_user(&self, name: &str, username: &str) -> User {
        let mut state = self.state.write().unwrap();
        let now = state.now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            username: Some(username.to_string()),
            display_username: Some(username.to_string()),
            email: format!("{}@example.com", username),
            email_verified: false,
            image: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push((user.clone(), String::new()));
        user
    }

    pub fn post_count(&self) -> usize {
        self.state.read().unwrap().posts.len()
    }

    pub fn like_count(&self) -> usize {
        self.state.read().unwrap().likes.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::UserAlreadyExists(
                "email already registered".to_string(),
            ));
        }
        if user.username.is_some()
            && state
                .users
                .iter()
                .any(|(u, _)| u.username == user.username)
        {
            return Err(DomainError::UserAlreadyExists(
                "username already taken".to_string(),
            ));
        }
        let now = state.now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            display_username: user.username.clone(),
            username: user.username,
            email: user.email,
            email_verified: false,
            image: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push((created.clone(), user.password_hash));
        Ok(created)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.users.iter().any(|(u, _)| u.id == id))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<UserSummary>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| UserSummary::from(u)))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, hash)| UserCredentials {
                id: u.id,
                username: u.username.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.username.as_deref() == Some(username))
            .map(|(u, hash)| UserCredentials {
                id: u.id,
                username: u.username.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut users: Vec<User> = state.users.iter().map(|(u, _)| u.clone()).collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(Page::new(paginate(&users, page), users.len() as i64))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, user_id: Uuid, post: NewPost) -> Result<Post, DomainError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let now = state.now();
        let created = Post {
            id: Uuid::new_v4(),
            title: post.title,
            content: post.content,
            user_id,
            created_at: now,
            updated_at: now,
        };
        state.posts.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.posts.retain(|p| p.id != id);
        state.comments.retain(|c| c.post_id != id);
        state.likes.retain(|l| l.post_id != id);
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        order: SortOrder,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        posts.sort_by_key(|p| (p.created_at, p.id));
        if order == SortOrder::Descending {
            posts.reverse();
        }
        Ok(Page::new(paginate(&posts, page), posts.len() as i64))
    }

    async fn list_feed(
        &self,
        viewer_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<FeedPost>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut posts = state.posts.clone();
        posts.sort_by_key(|p| std::cmp::Reverse((p.created_at, p.id)));
        let feed: Vec<FeedPost> = paginate(&posts, page)
            .into_iter()
            .map(|p| FeedPost {
                likes: state.likes.iter().filter(|l| l.post_id == p.id).count() as i64,
                comments_count: state.comments.iter().filter(|c| c.post_id == p.id).count()
                    as i64,
                liked_by_user: state
                    .likes
                    .iter()
                    .any(|l| l.post_id == p.id && l.user_id == viewer_id),
                username: state
                    .users
                    .iter()
                    .find(|(u, _)| u.id == p.user_id)
                    .and_then(|(u, _)| u.username.clone()),
                id: p.id,
                title: p.title,
                content: p.content,
                created_at: p.created_at,
                user_id: p.user_id,
            })
            .collect();
        Ok(Page::new(feed, posts.len() as i64))
    }

    async fn list_before(
        &self,
        before: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| p.created_at < before)
            .cloned()
            .collect();
        posts.sort_by_key(|p| (p.created_at, p.id));
        Ok(Page::new(paginate(&posts, page), posts.len() as i64))
    }

    async fn search_title(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let needle = keyword.to_lowercase();
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        posts.sort_by_key(|p| std::cmp::Reverse((p.created_at, p.id)));
        Ok(Page::new(paginate(&posts, page), posts.len() as i64))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let now = state.now();
        let comment = Comment {
            id: Uuid::new_v4(),
            content,
            user_id,
            post_id,
            created_at: now,
            updated_at: now,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn update_content(&self, id: Uuid, content: String) -> Result<Comment, DomainError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let now = state.now();
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::Internal(format!("comment {} vanished", id)))?;
        comment.content = content;
        comment.updated_at = now;
        Ok(comment.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.comments.retain(|c| c.id != id);
        Ok(())
    }

    async fn list_by_post(
        &self,
        post_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(Page::new(paginate(&comments, page), comments.len() as i64))
    }

    async fn list_all(&self, page: PageRequest) -> Result<Page<CommentWithContext>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut comments = state.comments.clone();
        comments.sort_by_key(|c| std::cmp::Reverse((c.created_at, c.id)));
        let items = paginate(&comments, page)
            .into_iter()
            .map(|c| CommentWithContext {
                user: CommentAuthor {
                    id: c.user_id,
                    name: state
                        .users
                        .iter()
                        .find(|(u, _)| u.id == c.user_id)
                        .map(|(u, _)| u.name.clone())
                        .unwrap_or_default(),
                },
                post: CommentedPost {
                    id: c.post_id,
                    title: state
                        .posts
                        .iter()
                        .find(|p| p.id == c.post_id)
                        .map(|p| p.title.clone())
                        .unwrap_or_default(),
                },
                comment: c,
            })
            .collect();
        Ok(Page::new(items, comments.len() as i64))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CommentWithPost>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| std::cmp::Reverse((c.created_at, c.id)));
        let items = paginate(&comments, page)
            .into_iter()
            .map(|c| CommentWithPost {
                post: CommentedPost {
                    id: c.post_id,
                    title: state
                        .posts
                        .iter()
                        .find(|p| p.id == c.post_id)
                        .map(|p| p.title.clone())
                        .unwrap_or_default(),
                },
                comment: c,
            })
            .collect();
        Ok(Page::new(items, comments.len() as i64))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn create(&self, user_id: Uuid, post_id: Uuid) -> Result<Like, DomainError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.post_id == post_id)
        {
            return Err(DomainError::LikeAlreadyExists);
        }
        let now = state.now();
        let like = Like {
            id: Uuid::new_v4(),
            user_id,
            post_id,
            created_at: now,
        };
        state.likes.push(like.clone());
        Ok(like)
    }

    async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.post_id == post_id)
            .cloned())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64, DomainError> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.likes.iter().filter(|l| l.post_id == post_id).count() as i64)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.likes.retain(|l| l.id != id);
        Ok(())
    }
}
