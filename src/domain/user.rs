//! User domain entity, roles and the account lockout state machine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    MAX_FAILED_LOGIN_ATTEMPTS, ROLE_ADMIN, ROLE_MANAGER, ROLE_USER, STATUS_ACTIVE, STATUS_INACTIVE,
};

/// Role attached to every account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    User,
}

impl UserRole {
    /// Roles allowed to read the cross-user record listing
    pub const SUPERVISORS: &'static [UserRole] = &[UserRole::Admin, UserRole::Manager];
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_MANAGER => UserRole::Manager,
            _ => UserRole::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::Manager => write!(f, "{}", ROLE_MANAGER),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// Administrative account status, independent of the lockout state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl From<&str> for AccountStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_INACTIVE => AccountStatus::Inactive,
            _ => AccountStatus::Active,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "{}", STATUS_ACTIVE),
            AccountStatus::Inactive => write!(f, "{}", STATUS_INACTIVE),
        }
    }
}

/// An employee account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: AccountStatus,
    pub failed_login_attempts: i32,
    pub is_blocked: bool,
    pub blocked_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check administrative status (independent of lockout)
    pub fn is_active(&self) -> bool {
        matches!(self.status, AccountStatus::Active)
    }

    /// Record a failed password check.
    ///
    /// Increments the attempt counter; on the attempt that reaches the
    /// limit, transitions the account to blocked and stamps the block
    /// timestamp. Returns true when this call caused the transition.
    pub fn record_login_failure(&mut self) -> bool {
        let now = Utc::now();
        self.failed_login_attempts += 1;
        self.updated_at = now;

        if !self.is_blocked && self.failed_login_attempts >= MAX_FAILED_LOGIN_ATTEMPTS {
            self.is_blocked = true;
            self.blocked_at = Some(now);
            return true;
        }
        false
    }

    /// Record a successful login: reset the failure counter and stamp
    /// the login time. Leaves the blocked flag untouched.
    pub fn record_login_success(&mut self) {
        let now = Utc::now();
        self.failed_login_attempts = 0;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Administrative unlock: blocked -> active, counter and block
    /// timestamp cleared.
    pub fn unlock(&mut self) {
        self.failed_login_attempts = 0;
        self.is_blocked = false;
        self.blocked_at = None;
        self.updated_at = Utc::now();
    }
}

/// Data required to create a user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

/// Partial update of mutable profile fields (email is immutable)
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

/// Minimal authenticated-caller context attached per request
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Public user view (safe to return to clients, never carries the hash)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    #[schema(example = "user")]
    pub role: String,
    #[schema(example = "active")]
    pub status: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role.to_string(),
            status: user.status.to_string(),
            job_title: user.job_title,
            department: user.department,
            hire_date: user.hire_date,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}
