pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use query::{Filter, ListQuery};
pub use store::DocumentStore;

use sqlx::PgPool;
use std::sync::Arc;

use memory::MemoryCollection;
use models::{Opportunity, Post, Project, Team, User};
use postgres::PgCollection;

/// All collections behind one handle; cheap to clone into request state
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn DocumentStore<User>>,
    pub posts: Arc<dyn DocumentStore<Post>>,
    pub projects: Arc<dyn DocumentStore<Project>>,
    pub teams: Arc<dyn DocumentStore<Team>>,
    pub opportunities: Arc<dyn DocumentStore<Opportunity>>,
    pool: Option<PgPool>,
}

impl Store {
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryCollection::<User>::new()),
            posts: Arc::new(MemoryCollection::<Post>::new()),
            projects: Arc::new(MemoryCollection::<Project>::new()),
            teams: Arc::new(MemoryCollection::<Team>::new()),
            opportunities: Arc::new(MemoryCollection::<Opportunity>::new()),
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgCollection::<User>::new(pool.clone())),
            posts: Arc::new(PgCollection::<Post>::new(pool.clone())),
            projects: Arc::new(PgCollection::<Project>::new(pool.clone())),
            teams: Arc::new(PgCollection::<Team>::new(pool.clone())),
            opportunities: Arc::new(PgCollection::<Opportunity>::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create every collection table and index that does not exist yet
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        PgCollection::<User>::new(pool.clone()).ensure_schema().await?;
        PgCollection::<Post>::new(pool.clone()).ensure_schema().await?;
        PgCollection::<Project>::new(pool.clone()).ensure_schema().await?;
        PgCollection::<Team>::new(pool.clone()).ensure_schema().await?;
        PgCollection::<Opportunity>::new(pool.clone()).ensure_schema().await?;
        Ok(())
    }

    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.pool {
            Some(pool) => DatabaseManager::health_check(pool).await,
            None => Ok(()),
        }
    }
}
