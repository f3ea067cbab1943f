use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use tokio::sync::RwLock;

use super::models::Document;
use super::query::{Filter, ListQuery};
use super::store::DocumentStore;
use super::DatabaseError;
use crate::types::RecordId;

struct Entry {
    doc: Value,
    version: i64,
    created_at: DateTime<Utc>,
    seq: u64,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<RecordId, Entry>,
    next_seq: u64,
}

/// Process-local collection holding documents in their serialized form
pub struct MemoryCollection<T> {
    inner: RwLock<Inner>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> MemoryCollection<T> {
    fn decode(entry: &Entry) -> Result<T, DatabaseError> {
        let mut doc: T = serde_json::from_value(entry.doc.clone())?;
        doc.meta_mut().version = entry.version;
        Ok(doc)
    }

    fn check_unique(inner: &Inner, id: RecordId, doc: &Value) -> Result<(), DatabaseError> {
        for field in T::UNIQUE_FIELDS {
            let value = match doc.get(*field) {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };
            let taken = inner
                .entries
                .iter()
                .any(|(other, entry)| *other != id && entry.doc.get(*field) == Some(value));
            if taken {
                return Err(DatabaseError::Duplicate(*field));
            }
        }
        Ok(())
    }

    /// Matching entries, newest first; later inserts win ties on `createdAt`
    fn sorted<'a>(inner: &'a Inner, filter: &Filter) -> Vec<&'a Entry> {
        let mut hits: Vec<&Entry> = inner
            .entries
            .values()
            .filter(|entry| filter.matches(&entry.doc))
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.seq.cmp(&a.seq)));
        hits
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for MemoryCollection<T> {
    async fn get(&self, id: RecordId) -> Result<Option<T>, DatabaseError> {
        let inner = self.inner.read().await;
        inner.entries.get(&id).map(Self::decode).transpose()
    }

    async fn get_many(&self, ids: &[RecordId]) -> Result<Vec<T>, DatabaseError> {
        let inner = self.inner.read().await;
        ids.iter()
            .filter_map(|id| inner.entries.get(id))
            .map(Self::decode)
            .collect()
    }

    async fn find(&self, query: &ListQuery) -> Result<Vec<T>, DatabaseError> {
        let inner = self.inner.read().await;
        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let take = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        Self::sorted(&inner, &query.filter)
            .into_iter()
            .skip(skip)
            .take(take)
            .map(Self::decode)
            .collect()
    }

    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.entries.values().filter(|e| filter.matches(&e.doc)).count() as u64)
    }

    async fn insert(&self, mut doc: T) -> Result<T, DatabaseError> {
        let id = doc.id();
        let created_at = doc.meta().created_at;
        doc.meta_mut().version = 1;
        let value = serde_json::to_value(&doc)?;

        let mut inner = self.inner.write().await;
        if inner.entries.contains_key(&id) {
            return Err(DatabaseError::Duplicate("id"));
        }
        Self::check_unique(&inner, id, &value)?;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(id, Entry { doc: value, version: 1, created_at, seq });
        Ok(doc)
    }

    async fn replace(&self, mut doc: T) -> Result<T, DatabaseError> {
        let id = doc.id();
        let expected = doc.meta().version;

        let mut inner = self.inner.write().await;
        let current = match inner.entries.get(&id) {
            Some(entry) => entry.version,
            None => return Err(DatabaseError::NotFound(format!("{} not found", T::TITLE))),
        };
        if current != expected {
            return Err(DatabaseError::VersionConflict);
        }

        doc.meta_mut().version = expected + 1;
        doc.meta_mut().updated_at = Utc::now();
        let value = serde_json::to_value(&doc)?;
        Self::check_unique(&inner, id, &value)?;
        if let Some(entry) = inner.entries.get_mut(&id) {
            entry.doc = value;
            entry.version = expected + 1;
        }
        Ok(doc)
    }

    async fn apply(&self, id: RecordId, change: &(dyn for<'a> Fn(&'a mut T) + Send + Sync)) -> Result<T, DatabaseError> {
        let mut inner = self.inner.write().await;
        let mut doc = match inner.entries.get(&id) {
            Some(entry) => Self::decode(entry)?,
            None => return Err(DatabaseError::NotFound(format!("{} not found", T::TITLE))),
        };

        change(&mut doc);
        let version = doc.meta().version + 1;
        doc.meta_mut().version = version;
        doc.meta_mut().updated_at = Utc::now();
        let value = serde_json::to_value(&doc)?;
        Self::check_unique(&inner, id, &value)?;
        if let Some(entry) = inner.entries.get_mut(&id) {
            entry.doc = value;
            entry.version = version;
        }
        Ok(doc)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, DatabaseError> {
        let mut inner = self.inner.write().await;
        Ok(inner.entries.remove(&id).is_some())
    }
}
