//! SeaORM table models, kept private to the repository layer.

pub mod performance_record;
pub mod user;
