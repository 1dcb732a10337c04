//! Service container: one construction point for every service.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, PerformanceService,
    PerformanceTracker,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Hands out the application's services as trait objects.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn performance(&self) -> Arc<dyn PerformanceService>;
}

/// The production container
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    performance_service: Arc<dyn PerformanceService>,
}

impl Services {
    /// Wire every service over a shared Unit of Work.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            account_service: Arc::new(AccountManager::new(uow.clone())),
            performance_service: Arc::new(PerformanceTracker::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn performance(&self) -> Arc<dyn PerformanceService> {
        self.performance_service.clone()
    }
}
