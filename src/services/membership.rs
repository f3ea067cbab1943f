use tracing::info;

use super::resource::{expand_one, mutate, Resource};
use crate::database::models::collections::{insert_unique, remove_all};
use crate::database::models::{Project, Team};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::policy::ensure_owner;
use crate::types::{Operation, RecordId};

/// Resources carrying a `members` set managed by their owner
pub trait HasMembers: Resource {
    fn members_mut(&mut self) -> &mut Vec<RecordId>;
}

impl HasMembers for Project {
    fn members_mut(&mut self) -> &mut Vec<RecordId> {
        &mut self.members
    }
}

impl HasMembers for Team {
    fn members_mut(&mut self) -> &mut Vec<RecordId> {
        &mut self.members
    }
}

/// Idempotent: an existing member means no write, and the current record comes back
pub async fn add_member<R: HasMembers>(
    store: &crate::database::Store,
    id: RecordId,
    user: RecordId,
    acting: &AuthUser,
) -> Result<R::View, ApiError> {
    let record = mutate(R::collection(store), id, |record: &mut R| {
        ensure_owner(&*record, acting, Operation::AddMember)?;
        Ok(insert_unique(record.members_mut(), user))
    })
    .await?;
    info!("Member {} now on {} {}", user, R::LABEL, id);
    expand_one(store, record).await
}

/// `user` of `None` names nobody who could be a member, so only the authorization runs
pub async fn remove_member<R: HasMembers>(
    store: &crate::database::Store,
    id: RecordId,
    user: Option<RecordId>,
    acting: &AuthUser,
) -> Result<R::View, ApiError> {
    let record = mutate(R::collection(store), id, |record: &mut R| {
        ensure_owner(&*record, acting, Operation::RemoveMember)?;
        Ok(match user {
            Some(user) => remove_all(record.members_mut(), user),
            None => false,
        })
    })
    .await?;
    expand_one(store, record).await
}
