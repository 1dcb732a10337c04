//! Business entities, value objects and state machines, free of any
//! infrastructure concern.

pub mod password;
pub mod performance;
pub mod user;

pub use password::Password;
pub use performance::{
    PerformanceRecord, PerformanceResponse, PerformanceSummary, RecordDraft, RecordFilter,
    RecordStatus,
};
pub use user::{AccountStatus, Identity, NewUser, ProfileChanges, User, UserResponse, UserRole};
