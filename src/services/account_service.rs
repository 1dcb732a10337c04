//! Account service: profile reads/updates, password changes and
//! administrative unlock.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Password, ProfileChanges, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Account maintenance use cases.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Get a user's profile
    async fn get_profile(&self, id: Uuid) -> AppResult<User>;

    /// Apply a partial update of mutable profile fields
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User>;

    /// Change password after verifying the current one
    async fn change_password(&self, id: Uuid, current: String, new: String) -> AppResult<()>;

    /// Administrative unlock: blocked -> active
    async fn unlock_account(&self, id: Uuid) -> AppResult<User>;
}

/// AccountService over the persistence UnitOfWork.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn get_profile(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        self.uow.users().update_profile(id, changes).await
    }

    async fn change_password(&self, id: Uuid, current: String, new: String) -> AppResult<()> {
        let user = self.uow.users().find_by_id(id).await?.ok_or_not_found()?;

        if !Password::from_hash(user.password_hash).verify(&current) {
            return Err(AppError::validation("Current password is incorrect"));
        }

        let password_hash = Password::new(&new)?.into_string();
        self.uow.users().update_password(id, password_hash).await
    }

    async fn unlock_account(&self, id: Uuid) -> AppResult<User> {
        let mut user = self.uow.users().find_by_id(id).await?.ok_or_not_found()?;

        user.unlock();
        self.uow.users().update_login_state(&user).await?;

        tracing::info!(user_id = %user.id, "account unlocked");
        Ok(user)
    }
}
