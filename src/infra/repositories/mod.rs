//! Repositories: trait-fronted data access.
//!
//! Each store pairs a trait (mockable in tests) with a SeaORM-backed
//! implementation; domain types cross the boundary, entities do not.

pub(crate) mod entities;
mod performance_repository;
mod user_repository;

pub use performance_repository::{PerformanceRepository, PerformanceStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use performance_repository::MockPerformanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
