use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::directory::UserDirectory;
use crate::database::models::Document;
use crate::database::{DatabaseError, DocumentStore, ListQuery, Store};
use crate::error::ApiError;
use crate::middleware::{AuthUser, Deleted};
use crate::policy::{ensure_owner, Owned};
use crate::types::{Operation, RecordId};

/// Attempts at load, authorize, mutate and write before giving up on a contended record
pub const MAX_WRITE_ATTEMPTS: usize = 3;

/// An owned, user-created entity with the common list/create/update/delete surface
pub trait Resource: Document + Owned {
    /// Client-settable fields, shared by create and update
    type Input: DeserializeOwned + Clone + Send + Sync + 'static;
    /// Response shape with user references expanded
    type View: Serialize + Send;

    fn collection(store: &Store) -> &dyn DocumentStore<Self>;

    /// Build a new record owned by `acting`
    fn create(input: Self::Input, acting: RecordId) -> Result<Self, ApiError>;

    /// Overlay non-empty input fields; must leave `self` untouched on error
    fn merge(&mut self, input: Self::Input) -> Result<(), ApiError>;

    /// Every user id this record's view expands
    fn user_refs(&self) -> Vec<RecordId>;

    fn into_view(self, users: &UserDirectory) -> Self::View;
}

pub async fn expand_one<R: Resource>(store: &Store, record: R) -> Result<R::View, ApiError> {
    let users = UserDirectory::load(store, record.user_refs()).await?;
    Ok(record.into_view(&users))
}

pub async fn expand_many<R: Resource>(store: &Store, records: Vec<R>) -> Result<Vec<R::View>, ApiError> {
    let refs = records.iter().flat_map(R::user_refs).collect();
    let users = UserDirectory::load(store, refs).await?;
    Ok(records.into_iter().map(|r| r.into_view(&users)).collect())
}

pub async fn list<R: Resource>(store: &Store, query: &ListQuery) -> Result<Vec<R::View>, ApiError> {
    let records = R::collection(store).find(query).await?;
    expand_many(store, records).await
}

pub async fn create<R: Resource>(store: &Store, input: R::Input, acting: &AuthUser) -> Result<R::View, ApiError> {
    let record = R::create(input, acting.id)?;
    let record = R::collection(store).insert(record).await?;
    info!("Created {} {} for {}", R::LABEL, record.id(), acting.id);
    expand_one(store, record).await
}

pub async fn update<R: Resource>(
    store: &Store,
    id: RecordId,
    input: R::Input,
    acting: &AuthUser,
) -> Result<R::View, ApiError> {
    let record = mutate(R::collection(store), id, |record: &mut R| {
        ensure_owner(&*record, acting, Operation::Update)?;
        record.merge(input.clone())?;
        Ok(true)
    })
    .await?;
    expand_one(store, record).await
}

pub async fn delete<R: Resource>(store: &Store, id: RecordId, acting: &AuthUser) -> Result<Deleted, ApiError> {
    let record = R::collection(store).get_404(id).await?;
    ensure_owner(&record, acting, Operation::Delete)?;
    if !R::collection(store).delete(id).await? {
        return Err(ApiError::not_found(format!("{} not found", R::TITLE)));
    }
    info!("Deleted {} {} by {}", R::LABEL, id, acting.id);
    Ok(Deleted {
        message: format!("{} deleted successfully", R::TITLE),
        id,
    })
}

/// Load, apply `change`, and write back conditionally on the version that was read.
///
/// `change` returns whether it modified the record; `false` skips the write. On a version
/// conflict the whole cycle reruns against a fresh copy, so authorization always sees
/// the record that gets written.
pub async fn mutate<R, F>(collection: &dyn DocumentStore<R>, id: RecordId, mut change: F) -> Result<R, ApiError>
where
    R: Document,
    F: FnMut(&mut R) -> Result<bool, ApiError> + Send,
{
    for attempt in 1..=MAX_WRITE_ATTEMPTS {
        let mut record = collection.get_404(id).await?;
        if !change(&mut record)? {
            return Ok(record);
        }
        match collection.replace(record).await {
            Ok(saved) => return Ok(saved),
            Err(DatabaseError::VersionConflict) => {
                debug!("Version conflict on {} {} (attempt {})", R::LABEL, id, attempt);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::conflict(format!(
        "{} was modified concurrently, please retry",
        R::TITLE
    )))
}
