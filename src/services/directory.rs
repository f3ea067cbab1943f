use std::collections::HashMap;

use crate::database::models::UserSummary;
use crate::database::{DatabaseError, Store};
use crate::types::RecordId;

/// User summaries fetched in one batch for expanding references in responses
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: HashMap<RecordId, UserSummary>,
}

impl UserDirectory {
    pub async fn load(store: &Store, mut ids: Vec<RecordId>) -> Result<Self, DatabaseError> {
        ids.sort();
        ids.dedup();
        let users = store
            .users
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|user| (user.meta.id, user.summary()))
            .collect();
        Ok(Self { users })
    }

    /// `None` when the user has since been deleted
    pub fn summary(&self, id: RecordId) -> Option<UserSummary> {
        self.users.get(&id).cloned()
    }

    /// Known users in `ids` order; dangling references are dropped
    pub fn summaries(&self, ids: &[RecordId]) -> Vec<UserSummary> {
        ids.iter().filter_map(|id| self.summary(*id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::User;

    #[tokio::test]
    async fn dangling_references_are_dropped() {
        let store = Store::memory();
        let ada = store
            .users
            .insert(User::new("Ada".into(), "ada@example.com", "h".into()))
            .await
            .unwrap();
        let ghost = RecordId::new();

        let directory = UserDirectory::load(&store, vec![ada.meta.id, ghost, ada.meta.id])
            .await
            .unwrap();
        assert!(directory.summary(ghost).is_none());

        let expanded = directory.summaries(&[ghost, ada.meta.id]);
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].name, "Ada");
    }
}
