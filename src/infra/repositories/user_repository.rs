//! User repository: credential store with account-state persistence.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::STATUS_ACTIVE;
use crate::domain::{NewUser, ProfileChanges, User, UserRole};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistence operations on user rows.
///
/// Emails are stored lowercased; callers normalize before lookup.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by (normalized) email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user with default role and active status
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Apply a partial profile update
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    /// Persist the login-state fields (failure counter, lockout flags,
    /// last-login timestamp) after a domain transition
    async fn update_login_state(&self, user: &User) -> AppResult<()>;
}

/// SeaORM-backed UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(UserRole::User.to_string()),
            status: Set(STATUS_ACTIVE.to_string()),
            failed_login_attempts: Set(0),
            is_blocked: Set(false),
            blocked_at: Set(None),
            last_login_at: Set(None),
            job_title: Set(new_user.job_title),
            department: Set(new_user.department),
            hire_date: Set(new_user.hire_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            // The unique email index is the final guard behind the
            // pre-write duplicate check
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateEmail,
                _ => AppError::from(e),
            }
        })?;

        Ok(User::from(model))
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        let mut active: ActiveModel = self.fetch(id).await?.into();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(job_title) = changes.job_title {
            active.job_title = Set(Some(job_title));
        }
        if let Some(department) = changes.department {
            active.department = Set(Some(department));
        }
        if let Some(hire_date) = changes.hire_date {
            active.hire_date = Set(Some(hire_date));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut active: ActiveModel = self.fetch(id).await?.into();

        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn update_login_state(&self, user: &User) -> AppResult<()> {
        let mut active: ActiveModel = self.fetch(user.id).await?.into();

        active.failed_login_attempts = Set(user.failed_login_attempts);
        active.is_blocked = Set(user.is_blocked);
        active.blocked_at = Set(user.blocked_at);
        active.last_login_at = Set(user.last_login_at);
        active.updated_at = Set(user.updated_at);

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }
}
