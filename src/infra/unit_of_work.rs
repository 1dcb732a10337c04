//! Unit of Work: the single seam between services and persistence.
//!
//! Services hold one of these instead of a raw connection; tests swap
//! in mock or in-memory repositories through the same trait.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{PerformanceRepository, PerformanceStore, UserRepository, UserStore};

pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn performance_records(&self) -> Arc<dyn PerformanceRepository>;
}

/// SeaORM-backed repositories sharing one connection pool
pub struct Persistence {
    users: Arc<UserStore>,
    records: Arc<PerformanceStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            records: Arc::new(PerformanceStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn performance_records(&self) -> Arc<dyn PerformanceRepository> {
        self.records.clone()
    }
}
