//! Infrastructure: everything that touches the outside world.
//!
//! Owns the database connection and migrations, the SeaORM-backed
//! repositories, and the UnitOfWork seam services reach them through.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{PerformanceRepository, PerformanceStore, UserRepository, UserStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockPerformanceRepository, MockUserRepository};
