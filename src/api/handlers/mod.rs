//! Route handlers, grouped by resource.

pub mod auth_handler;
pub mod performance_handler;

pub use auth_handler::auth_routes;
pub use performance_handler::performance_routes;
