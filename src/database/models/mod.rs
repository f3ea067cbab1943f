pub mod collections;
pub mod opportunity;
pub mod post;
pub mod project;
pub mod team;
pub mod user;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::types::RecordId;

pub use opportunity::{Opportunity, OpportunityInput, OpportunityKind, OpportunityView};
pub use post::{Comment, CommentView, Post, PostInput, PostView};
pub use project::{Project, ProjectInput, ProjectStatus, ProjectView};
pub use team::{Team, TeamInput, TeamView};
pub use user::{ProfileInput, User, UserProfile, UserSummary};

/// System-assigned envelope carried by every stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency counter, kept outside the document body
    #[serde(skip)]
    pub version: i64,
}

impl Meta {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new()
    }
}

/// A record type persisted in its own collection
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection (table) name
    const COLLECTION: &'static str;
    /// Lowercase noun used in client messages ("post")
    const LABEL: &'static str;
    /// Capitalized noun used in client messages ("Post")
    const TITLE: &'static str;
    /// Top-level document fields that must be unique across the collection
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn meta(&self) -> &Meta;
    fn meta_mut(&mut self) -> &mut Meta;

    fn id(&self) -> RecordId {
        self.meta().id
    }
}

/// Overwrite `target` only when `value` carries non-blank text
pub(crate) fn overlay_text(target: &mut String, value: Option<String>) {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        *target = v;
    }
}

/// Same as [`overlay_text`] for optional attributes
pub(crate) fn overlay_optional(target: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        *target = Some(v);
    }
}

/// Arrays replace wholesale whenever the client sends one
pub(crate) fn overlay_list(target: &mut Vec<String>, value: Option<Vec<String>>) {
    if let Some(v) = value {
        *target = v;
    }
}

/// Required text on create: present and not blank
pub(crate) fn required_text(field: &str, value: Option<String>) -> Result<String, crate::error::ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(crate::error::ApiError::field_error(
            field,
            format!("`{}` is required", field),
        )),
    }
}

/// Optional text on create: blank collapses to absent
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
