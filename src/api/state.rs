//! Shared state handed to every handler.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{AccountService, AuthService, PerformanceService, Services};

/// The services (and the connection behind the health probe) every
/// request can reach.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub account_service: Arc<dyn AccountService>,
    pub performance_service: Arc<dyn PerformanceService>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the production services over a live connection.
    pub fn from_config(database: Arc<Database>, config: crate::config::Config) -> Self {
        use crate::services::ServiceContainer;

        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            account_service: container.accounts(),
            performance_service: container.performance(),
            database,
        }
    }

    /// Inject already-built services (handler tests).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        account_service: Arc<dyn AccountService>,
        performance_service: Arc<dyn PerformanceService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            performance_service,
            database,
        }
    }
}
