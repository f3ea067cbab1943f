use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, overlay_list, overlay_optional, overlay_text, required_text, Document, Meta, UserSummary};
use crate::error::ApiError;
use crate::types::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten)]
    pub meta: Meta,
    /// Owner
    pub user: RecordId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: Vec<RecordId>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: RecordId,
    /// Author
    pub user: RecordId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(user: RecordId, text: String) -> Self {
        Self {
            id: RecordId::new(),
            user,
            text,
            created_at: Utc::now(),
        }
    }
}

impl Post {
    pub fn from_input(input: PostInput, user: RecordId) -> Result<Self, ApiError> {
        Ok(Self {
            meta: Meta::new(),
            user,
            content: required_text("content", input.content)?,
            image: optional_text(input.image),
            tags: input.tags.unwrap_or_default(),
            likes: Vec::new(),
            comments: Vec::new(),
        })
    }

    pub fn apply(&mut self, input: PostInput) {
        overlay_text(&mut self.content, input.content);
        overlay_optional(&mut self.image, input.image);
        overlay_list(&mut self.tags, input.tags);
    }

    pub fn comment(&self, id: RecordId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn comment_mut(&mut self, id: RecordId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == id)
    }

    /// Remove exactly the comment with `id`
    pub fn remove_comment(&mut self, id: RecordId) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != id);
        self.comments.len() != before
    }
}

impl Document for Post {
    const COLLECTION: &'static str = "posts";
    const LABEL: &'static str = "post";
    const TITLE: &'static str = "Post";

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

/// Client-settable post fields, shared by create and update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    pub content: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: RecordId,
    pub user: Option<UserSummary>,
    pub content: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub likes: Vec<RecordId>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: RecordId,
    pub user: Option<UserSummary>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
