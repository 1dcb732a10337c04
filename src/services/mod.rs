//! Use-case services.
//!
//! Each service is a trait plus one implementation over the
//! persistence UnitOfWork; handlers and tests depend only on the
//! traits.

mod account_service;
mod auth_service;
pub mod container;
mod performance_service;

pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthResponse, AuthService, Authenticator, Claims, Registration};
pub use container::{ServiceContainer, Services};
pub use performance_service::{PerformanceService, PerformanceTracker};
