//! Salestrack - sales performance tracking API.
//!
//! Authenticates employees, stores one performance record per employee
//! per calendar month, and serves aggregate statistics over validated
//! records.
//!
//! The crate is layered bottom-up: `config` and `errors` underpin
//! everything; `domain` holds the entities, the account lockout state
//! machine and the record validation stage; `infra` owns SeaORM
//! entities, migrations and repositories behind a `UnitOfWork`;
//! `services` implement the use cases; `api` exposes them over axum;
//! `cli`/`commands` drive the binary (`serve`, `migrate`).

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Frequently used types, surfaced at the crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, PerformanceRecord, User, UserRole};
pub use errors::{AppError, AppResult};
