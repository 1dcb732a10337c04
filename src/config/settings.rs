//! Runtime settings, read once at startup.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_DAYS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_JWT_SECRET_LENGTH,
};

/// Process-wide configuration, passed explicitly to whatever needs it
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_days", &self.jwt_expiration_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    /// Load configuration from the environment (and a `.env` file if
    /// one is present).
    ///
    /// # Panics
    /// Panics on a missing JWT secret in release builds, or one shorter
    /// than the required minimum in any build.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        assert!(
            jwt_secret.len() >= MIN_JWT_SECRET_LENGTH,
            "JWT_SECRET must be at least {} characters long",
            MIN_JWT_SECRET_LENGTH
        );

        Self {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            jwt_secret,
            jwt_expiration_days: env_parsed("JWT_EXPIRATION_DAYS", DEFAULT_JWT_EXPIRATION_DAYS),
            server_host: env_or("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port: env_parsed("SERVER_PORT", DEFAULT_SERVER_PORT),
        }
    }

    /// Fixed configuration for tests (no environment access).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32ch".to_string(),
            jwt_expiration_days: DEFAULT_JWT_EXPIRATION_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }

    /// JWT secret bytes for token signing and verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}
