//! Migration: Create the performance_records table.
//!
//! Carries the (user_id, year, month) unique index that backs the
//! upsert's race safety.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PerformanceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PerformanceRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PerformanceRecords::UserId).uuid().not_null())
                    .col(ColumnDef::new(PerformanceRecords::Year).integer().not_null())
                    .col(ColumnDef::new(PerformanceRecords::Month).integer().not_null())
                    .col(
                        ColumnDef::new(PerformanceRecords::Revenue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::RevenueTarget)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::NewClients)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::AppointmentsCompleted)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::AppointmentsPlanned)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::SalesCompleted)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::FilesUpdated)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::TotalFiles)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::EventCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::Satisfaction)
                            .integer()
                            .not_null()
                            .default(4),
                    )
                    .col(ColumnDef::new(PerformanceRecords::Comment).string().null())
                    .col(ColumnDef::new(PerformanceRecords::Status).string().not_null())
                    .col(
                        ColumnDef::new(PerformanceRecords::ValidatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PerformanceRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_records_user")
                            .from(PerformanceRecords::Table, PerformanceRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One record per user per calendar month
        manager
            .create_index(
                Index::create()
                    .name("uq_performance_records_user_period")
                    .table(PerformanceRecords::Table)
                    .col(PerformanceRecords::UserId)
                    .col(PerformanceRecords::Year)
                    .col(PerformanceRecords::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listing and stats filter by user, status and period
        manager
            .create_index(
                Index::create()
                    .name("idx_performance_records_user_status")
                    .table(PerformanceRecords::Table)
                    .col(PerformanceRecords::UserId)
                    .col(PerformanceRecords::Status)
                    .col(PerformanceRecords::Year)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_performance_records_user_status")
                    .table(PerformanceRecords::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_performance_records_user_period")
                    .table(PerformanceRecords::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PerformanceRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PerformanceRecords {
    Table,
    Id,
    UserId,
    Year,
    Month,
    Revenue,
    RevenueTarget,
    NewClients,
    AppointmentsCompleted,
    AppointmentsPlanned,
    SalesCompleted,
    FilesUpdated,
    TotalFiles,
    EventCount,
    Satisfaction,
    Comment,
    Status,
    ValidatedAt,
    CreatedAt,
    UpdatedAt,
}
