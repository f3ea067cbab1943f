use async_trait::async_trait;

use super::models::Document;
use super::query::{Filter, ListQuery};
use super::DatabaseError;
use crate::types::RecordId;

/// Persistence for one collection of documents.
///
/// `replace` is conditional on the version the caller read: when another writer got
/// there first it fails with [`DatabaseError::VersionConflict`] and nothing is written.
#[async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    async fn get(&self, id: RecordId) -> Result<Option<T>, DatabaseError>;

    /// Fetch whichever of `ids` still exist, in no particular order
    async fn get_many(&self, ids: &[RecordId]) -> Result<Vec<T>, DatabaseError>;

    /// Matching documents, newest first
    async fn find(&self, query: &ListQuery) -> Result<Vec<T>, DatabaseError>;

    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError>;

    /// Store a new document at version 1
    async fn insert(&self, doc: T) -> Result<T, DatabaseError>;

    /// Overwrite a document read at `doc.meta().version`, bumping version and `updatedAt`
    async fn replace(&self, doc: T) -> Result<T, DatabaseError>;

    /// Apply `change` to the current document and write it back as one atomic step.
    ///
    /// Concurrent callers are serialized on the document, so no change is ever lost or
    /// refused with a conflict. Meant for edits that need no check against what was read.
    async fn apply(&self, id: RecordId, change: &(dyn for<'a> Fn(&'a mut T) + Send + Sync)) -> Result<T, DatabaseError>;

    /// True when a document was removed
    async fn delete(&self, id: RecordId) -> Result<bool, DatabaseError>;

    async fn find_one(&self, filter: &Filter) -> Result<Option<T>, DatabaseError> {
        let query = ListQuery::filtered(filter.clone()).window(0, 1);
        Ok(self.find(&query).await?.into_iter().next())
    }

    /// Like [`get`](Self::get) but a missing document is an error
    async fn get_404(&self, id: RecordId) -> Result<T, DatabaseError> {
        self.get(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", T::TITLE)))
    }
}
