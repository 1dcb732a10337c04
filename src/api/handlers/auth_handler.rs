//! Authentication and account handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::auth_middleware;
use crate::api::AppState;
use crate::domain::{Identity, ProfileChanges, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::{AuthResponse, Registration};
use crate::types::ApiResponse;

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Given name
    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Jane")]
    pub first_name: String,
    /// Family name
    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    /// Email address (stored lowercased, unique)
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[schema(example = "Account Executive")]
    pub job_title: Option<String>,
    #[schema(example = "Sales")]
    pub department: Option<String>,
    #[schema(example = "2023-09-01")]
    pub hire_date: Option<NaiveDate>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Partial profile update (email is immutable)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Create authentication routes (public + token-protected)
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let protected = Router::new()
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .route("/change-password", put(change_password))
        .route("/logout", post(logout))
        .route("/unlock/:id", post(unlock_account))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}

/// Register a new employee account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error or duplicate email")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let auth = state
        .auth_service
        .register(Registration {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
            job_title: payload.job_title,
            department: payload.department,
            hire_date: payload.hire_date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(auth, "Account created")),
    ))
}

/// Login and obtain a session token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account inactive"),
        (status = 423, description = "Account blocked")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let auth = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(ApiResponse::with_message(auth, "Login successful")))
}

/// Current user's public profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.account_service.get_profile(identity.id).await?;

    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

/// Update mutable profile fields
#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .account_service
        .update_profile(
            identity.id,
            ProfileChanges {
                first_name: payload.first_name,
                last_name: payload.last_name,
                job_title: payload.job_title,
                department: payload.department,
                hire_date: payload.hire_date,
            },
        )
        .await?;

    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Profile updated",
    )))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password incorrect or new password invalid")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .account_service
        .change_password(identity.id, payload.current_password, payload.new_password)
        .await?;

    Ok(Json(ApiResponse::message("Password updated")))
}

/// Logout acknowledgement (tokens are stateless; nothing is revoked)
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Logged out"))
)]
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Logged out"))
}

/// Administrative unlock of a blocked account
#[utoipa::path(
    post,
    path = "/auth/unlock/{id}",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User to unlock")),
    responses(
        (status = 200, description = "Account unlocked", body = UserResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn unlock_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    state
        .auth_service
        .require_role(identity.id, &[UserRole::Admin])
        .await?;

    let user = state.account_service.unlock_account(id).await?;

    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Account unlocked",
    )))
}
