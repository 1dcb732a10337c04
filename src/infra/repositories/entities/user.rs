//! SeaORM model for the users table.

use sea_orm::entity::prelude::*;

use crate::domain::{AccountStatus, User, UserRole};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub failed_login_attempts: i32,
    pub is_blocked: bool,
    pub blocked_at: Option<DateTimeUtc>,
    pub last_login_at: Option<DateTimeUtc>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub hire_date: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::performance_record::Entity")]
    PerformanceRecord,
}

impl Related<super::performance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            password_hash: model.password_hash,
            role: UserRole::from(model.role.as_str()),
            status: AccountStatus::from(model.status.as_str()),
            failed_login_attempts: model.failed_login_attempts,
            is_blocked: model.is_blocked,
            blocked_at: model.blocked_at,
            last_login_at: model.last_login_at,
            job_title: model.job_title,
            department: model.department,
            hire_date: model.hire_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
