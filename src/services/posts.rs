use serde::Serialize;
use tracing::info;

use super::directory::UserDirectory;
use super::resource::{expand_many, expand_one, mutate, Resource};
use crate::config::PaginationConfig;
use crate::database::models::collections::toggle;
use crate::database::models::{Comment, CommentView, Post, PostInput, PostView};
use crate::database::{DocumentStore, Filter, ListQuery, Store};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::policy::{ensure_comment_editable, ensure_comment_removable};
use crate::types::RecordId;

impl Resource for Post {
    type Input = PostInput;
    type View = PostView;

    fn collection(store: &Store) -> &dyn DocumentStore<Self> {
        &*store.posts
    }

    fn create(input: PostInput, acting: RecordId) -> Result<Self, ApiError> {
        Post::from_input(input, acting)
    }

    fn merge(&mut self, input: PostInput) -> Result<(), ApiError> {
        self.apply(input);
        Ok(())
    }

    fn user_refs(&self) -> Vec<RecordId> {
        std::iter::once(self.user)
            .chain(self.comments.iter().map(|c| c.user))
            .collect()
    }

    fn into_view(self, users: &UserDirectory) -> PostView {
        PostView {
            id: self.meta.id,
            user: users.summary(self.user),
            content: self.content,
            image: self.image,
            tags: self.tags,
            likes: self.likes,
            comments: self
                .comments
                .into_iter()
                .map(|c| CommentView {
                    id: c.id,
                    user: users.summary(c.user),
                    text: c.text,
                    created_at: c.created_at,
                })
                .collect(),
            created_at: self.meta.created_at,
            updated_at: self.meta.updated_at,
        }
    }
}

/// One page of the feed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

/// Requested window, already clamped to valid bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Page starts at 1; limit falls back to the configured default and is capped at the maximum
    pub fn clamp(page: Option<u64>, limit: Option<u64>, pagination: &PaginationConfig) -> Self {
        let max = pagination.max_limit.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(pagination.default_limit).clamp(1, max),
        }
    }

    /// Rows before this page, never beyond what a bigint OFFSET can express
    fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(i64::MAX as u64)
    }
}

pub async fn list_page(store: &Store, tag: Option<String>, page: PageRequest) -> Result<PostPage, ApiError> {
    let filter = match tag.filter(|t| !t.trim().is_empty()) {
        Some(tag) => Filter::contains("tags", tag),
        None => Filter::All,
    };
    let total = store.posts.count(&filter).await?;
    let records = store
        .posts
        .find(&ListQuery::filtered(filter).window(page.skip(), page.limit))
        .await?;

    Ok(PostPage {
        posts: expand_many(store, records).await?,
        total_pages: total.div_ceil(page.limit),
        current_page: page.page,
        total,
    })
}

/// Like if absent, unlike if present; any authenticated user may toggle their own like
pub async fn toggle_like(store: &Store, id: RecordId, acting: &AuthUser) -> Result<PostView, ApiError> {
    let user = acting.id;
    let post = store
        .posts
        .apply(id, &move |post: &mut Post| {
            toggle(&mut post.likes, user);
        })
        .await?;
    expand_one(store, post).await
}

fn comment_text(text: Option<String>) -> Result<String, ApiError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(ApiError::field_error("text", "`text` is required")),
    }
}

fn comment_not_found() -> ApiError {
    ApiError::not_found("Comment not found")
}

pub async fn add_comment(
    store: &Store,
    id: RecordId,
    text: Option<String>,
    acting: &AuthUser,
) -> Result<PostView, ApiError> {
    let text = comment_text(text)?;
    let user = acting.id;
    let post = store
        .posts
        .apply(id, &move |post: &mut Post| post.comments.push(Comment::new(user, text.clone())))
        .await?;
    info!("Comment added to post {} by {}", id, acting.id);
    expand_one(store, post).await
}

pub async fn edit_comment(
    store: &Store,
    id: RecordId,
    comment_id: RecordId,
    text: Option<String>,
    acting: &AuthUser,
) -> Result<PostView, ApiError> {
    let text = comment_text(text)?;
    let post = mutate(&*store.posts, id, |post: &mut Post| {
        let comment = post.comment_mut(comment_id).ok_or_else(comment_not_found)?;
        ensure_comment_editable(&*comment, acting)?;
        comment.text = text.clone();
        Ok(true)
    })
    .await?;
    expand_one(store, post).await
}

pub async fn delete_comment(
    store: &Store,
    id: RecordId,
    comment_id: RecordId,
    acting: &AuthUser,
) -> Result<PostView, ApiError> {
    let post = mutate(&*store.posts, id, |post: &mut Post| {
        let comment = post.comment(comment_id).ok_or_else(comment_not_found)?;
        ensure_comment_removable(&*post, comment, acting)?;
        Ok(post.remove_comment(comment_id))
    })
    .await?;
    info!("Comment {} removed from post {} by {}", comment_id, id, acting.id);
    expand_one(store, post).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination() -> PaginationConfig {
        PaginationConfig { default_limit: 10, max_limit: 100 }
    }

    #[test]
    fn page_request_defaults_and_clamps() {
        let p = pagination();
        assert_eq!(PageRequest::clamp(None, None, &p), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::clamp(Some(0), Some(0), &p), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::clamp(Some(3), Some(500), &p), PageRequest { page: 3, limit: 100 });
    }

    #[test]
    fn skip_is_zero_based() {
        assert_eq!(PageRequest { page: 1, limit: 10 }.skip(), 0);
        assert_eq!(PageRequest { page: 3, limit: 10 }.skip(), 20);
    }

    #[test]
    fn skip_saturates_for_absurd_pages() {
        let p = pagination();
        let huge = PageRequest::clamp(Some(1_000_000_000_000_000_000), None, &p);
        assert_eq!(huge.skip(), i64::MAX as u64);
        assert_eq!(PageRequest { page: u64::MAX, limit: 100 }.skip(), i64::MAX as u64);
    }
}
