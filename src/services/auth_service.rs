//! Authentication service: registration, login with account lockout,
//! session token issue/verify, and the per-request authorization gate.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_DAY, TOKEN_TYPE_BEARER};
use crate::domain::{Identity, NewUser, Password, User, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload.
///
/// Deliberately carries only the user id: role and account state are
/// re-resolved from the credential store on every request, so changes
/// take effect without token reissue.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Registration input assembled by the handler
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

/// Session payload returned after successful registration or login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Signed session token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 2592000)]
    pub expires_in: i64,
    /// Public view of the authenticated user
    pub user: UserResponse,
}

/// Authentication use cases, trait-fronted so handlers and tests share
/// one seam.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new employee account and issue a session token
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse>;

    /// Login and issue a session token
    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Verify a session token and extract the user id
    fn verify_token(&self, token: &str) -> AppResult<Uuid>;

    /// Full authorization gate: token -> user -> account-state checks
    async fn authenticate(&self, token: &str) -> AppResult<Identity>;

    /// Reload the caller's role and require membership in `allowed`
    async fn require_role(&self, user_id: Uuid, allowed: &[UserRole]) -> AppResult<()>;
}

/// AuthService over the persistence UnitOfWork.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    fn issue_token(&self, user: &User) -> AppResult<(String, i64)> {
        let now = Utc::now();
        let expires_at = now + Duration::days(self.config.jwt_expiration_days);

        let claims = Claims {
            sub: user.id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )
        .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok((token, self.config.jwt_expiration_days * SECONDS_PER_DAY))
    }

    fn session(&self, user: User) -> AppResult<AuthResponse> {
        let (token, expires_in) = self.issue_token(&user)?;
        Ok(AuthResponse {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
            user: UserResponse::from(user),
        })
    }
}

/// Lowercase + trim, applied before every email comparison or write
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse> {
        let email = normalize_email(&registration.email);

        // Duplicate check before any write; the unique index catches races
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email,
                password_hash,
                job_title: registration.job_title,
                department: registration.department,
                hire_date: registration.hire_date,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        self.session(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let email = normalize_email(&email);

        // Same error for unknown email and wrong password, so valid
        // addresses cannot be enumerated
        let Some(mut user) = self.uow.users().find_by_email(&email).await? else {
            return Err(AppError::InvalidCredentials);
        };

        if !user.is_active() {
            return Err(AppError::AccountInactive);
        }

        // Blocked accounts are rejected before any password comparison
        if user.is_blocked {
            return Err(AppError::AccountBlocked);
        }

        let valid = Password::from_hash(user.password_hash.clone()).verify(&password);
        if !valid {
            let became_blocked = user.record_login_failure();
            self.uow.users().update_login_state(&user).await?;

            if became_blocked {
                tracing::warn!(user_id = %user.id, "account blocked after repeated login failures");
                return Err(AppError::AccountBlocked);
            }
            return Err(AppError::InvalidCredentials);
        }

        user.record_login_success();
        self.uow.users().update_login_state(&user).await?;

        self.session(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Uuid> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::TokenInvalid,
        })?;

        Ok(token_data.claims.sub)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Identity> {
        let user_id = self.verify_token(token)?;

        // Account state may have changed since the token was issued;
        // re-check it on every request
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active() {
            return Err(AppError::AccountInactive);
        }
        if user.is_blocked {
            return Err(AppError::AccountBlocked);
        }

        Ok(Identity {
            id: user.id,
            email: user.email.clone(),
            name: user.full_name(),
        })
    }

    async fn require_role(&self, user_id: Uuid, allowed: &[UserRole]) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if allowed.contains(&user.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
