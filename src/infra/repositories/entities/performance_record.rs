//! SeaORM model for the performance_records table.
//!
//! The (user_id, year, month) uniqueness constraint lives in the
//! migration; it is the race-safety net behind the upsert.

use sea_orm::entity::prelude::*;

use crate::domain::{PerformanceRecord, RecordStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "performance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub revenue: f64,
    pub revenue_target: f64,
    pub new_clients: i32,
    pub appointments_completed: i32,
    pub appointments_planned: i32,
    pub sales_completed: i32,
    pub files_updated: i32,
    pub total_files: i32,
    pub event_count: i32,
    pub satisfaction: i32,
    pub comment: Option<String>,
    pub status: String,
    pub validated_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PerformanceRecord {
    fn from(model: Model) -> Self {
        PerformanceRecord {
            id: model.id,
            user_id: model.user_id,
            year: model.year,
            month: model.month,
            revenue: model.revenue,
            revenue_target: model.revenue_target,
            new_clients: model.new_clients,
            appointments_completed: model.appointments_completed,
            appointments_planned: model.appointments_planned,
            sales_completed: model.sales_completed,
            files_updated: model.files_updated,
            total_files: model.total_files,
            event_count: model.event_count,
            satisfaction: model.satisfaction,
            comment: model.comment,
            status: RecordStatus::from(model.status.as_str()),
            validated_at: model.validated_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
