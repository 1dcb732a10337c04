//! OpenAPI document, served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, performance_handler};
use crate::domain::{
    AccountStatus, PerformanceResponse, PerformanceSummary, RecordStatus, UserResponse, UserRole,
};
use crate::services::AuthResponse;

/// OpenAPI documentation for the sales performance API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salestrack API",
        version = "0.1.0",
        description = "Sales performance tracking API with employee authentication",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        auth_handler::update_profile,
        auth_handler::change_password,
        auth_handler::logout,
        auth_handler::unlock_account,
        // Performance records
        performance_handler::upsert_record,
        performance_handler::list_records,
        performance_handler::list_all_records,
        performance_handler::stats_summary,
        performance_handler::get_record,
        performance_handler::delete_record,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            AccountStatus,
            RecordStatus,
            UserResponse,
            PerformanceResponse,
            PerformanceSummary,
            AuthResponse,
            // Request types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::UpdateProfileRequest,
            auth_handler::ChangePasswordRequest,
            performance_handler::UpsertRecordRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and account management"),
        (name = "Performance", description = "Monthly performance records and statistics")
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme with the generated document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
