use tracing::debug;

use crate::database::models::{Comment, Document, Opportunity, Post, Project, Team, User};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::types::{Operation, RecordId};

/// Records with one identity allowed to mutate them
pub trait Owned {
    fn owner(&self) -> RecordId;
}

impl Owned for Post {
    fn owner(&self) -> RecordId {
        self.user
    }
}

impl Owned for Project {
    fn owner(&self) -> RecordId {
        self.owner
    }
}

impl Owned for Team {
    fn owner(&self) -> RecordId {
        self.leader
    }
}

impl Owned for Opportunity {
    fn owner(&self) -> RecordId {
        self.poster
    }
}

impl Owned for User {
    fn owner(&self) -> RecordId {
        self.meta.id
    }
}

/// Refuse `op` unless the acting identity owns `record`.
///
/// Callers load first (so a missing record is a 404) and mutate only after this passes.
pub fn ensure_owner<D: Document + Owned>(record: &D, acting: &AuthUser, op: Operation) -> Result<(), ApiError> {
    let allowed = record.owner() == acting.id;
    debug!(
        "{:?} on {} {} by {}: {}",
        op,
        D::LABEL,
        record.id(),
        acting.id,
        if allowed { "allowed" } else { "refused" }
    );
    if allowed {
        Ok(())
    } else {
        Err(ApiError::forbidden(op.refusal(D::LABEL)))
    }
}

/// Only the author edits a comment
pub fn ensure_comment_editable(comment: &Comment, acting: &AuthUser) -> Result<(), ApiError> {
    if comment.user == acting.id {
        Ok(())
    } else {
        Err(ApiError::forbidden(Operation::EditComment.refusal("comment")))
    }
}

/// The comment's author or the post's owner may remove it
pub fn ensure_comment_removable(post: &Post, comment: &Comment, acting: &AuthUser) -> Result<(), ApiError> {
    if comment.user == acting.id || post.owner() == acting.id {
        Ok(())
    } else {
        Err(ApiError::forbidden(Operation::DeleteComment.refusal("comment")))
    }
}
