//! Performance record repository: per-user monthly metrics with
//! upsert-by-period semantics.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::performance_record::{self, ActiveModel, Entity as RecordEntity};
use crate::domain::{PerformanceRecord, RecordDraft, RecordFilter, RecordStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistence operations on performance record rows.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PerformanceRepository: Send + Sync {
    /// Find record by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PerformanceRecord>>;

    /// Find a user's record for one (year, month) period
    async fn find_by_period(
        &self,
        user_id: Uuid,
        year: i32,
        month: i32,
    ) -> AppResult<Option<PerformanceRecord>>;

    /// Insert a new record; a period collision surfaces as DuplicatePeriod
    async fn insert(&self, user_id: Uuid, draft: RecordDraft) -> AppResult<PerformanceRecord>;

    /// Replace an existing record's fields in place
    async fn update(&self, id: Uuid, draft: RecordDraft) -> AppResult<PerformanceRecord>;

    /// List a user's records, newest period first, with total count
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: RecordFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<PerformanceRecord>, u64)>;

    /// List every record across all users, newest period first
    async fn list_all(&self) -> AppResult<Vec<PerformanceRecord>>;

    /// Delete record by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// A user's validated records for a year, optionally one month
    async fn find_validated(
        &self,
        user_id: Uuid,
        year: i32,
        month: Option<i32>,
    ) -> AppResult<Vec<PerformanceRecord>>;
}

/// SeaORM-backed PerformanceRepository
pub struct PerformanceStore {
    db: DatabaseConnection,
}

impl PerformanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn apply_draft(active: &mut ActiveModel, draft: RecordDraft) {
    active.year = Set(draft.year);
    active.month = Set(draft.month);
    active.revenue = Set(draft.revenue);
    active.revenue_target = Set(draft.revenue_target);
    active.new_clients = Set(draft.new_clients);
    active.appointments_completed = Set(draft.appointments_completed);
    active.appointments_planned = Set(draft.appointments_planned);
    active.sales_completed = Set(draft.sales_completed);
    active.files_updated = Set(draft.files_updated);
    active.total_files = Set(draft.total_files);
    active.event_count = Set(draft.event_count);
    active.satisfaction = Set(draft.satisfaction);
    active.comment = Set(draft.comment);
    active.status = Set(draft.status.to_string());
    active.updated_at = Set(Utc::now());
}

#[async_trait]
impl PerformanceRepository for PerformanceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PerformanceRecord>> {
        let result = RecordEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(PerformanceRecord::from))
    }

    async fn find_by_period(
        &self,
        user_id: Uuid,
        year: i32,
        month: i32,
    ) -> AppResult<Option<PerformanceRecord>> {
        let result = RecordEntity::find()
            .filter(performance_record::Column::UserId.eq(user_id))
            .filter(performance_record::Column::Year.eq(year))
            .filter(performance_record::Column::Month.eq(month))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(PerformanceRecord::from))
    }

    async fn insert(&self, user_id: Uuid, draft: RecordDraft) -> AppResult<PerformanceRecord> {
        let now = Utc::now();
        let validated_at = (draft.status == RecordStatus::Validated).then_some(now);

        let mut active = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            validated_at: Set(validated_at),
            created_at: Set(now),
            ..Default::default()
        };
        apply_draft(&mut active, draft);

        let model = active.insert(&self.db).await.map_err(|e| {
            // Losing writer of a same-period race lands here via the
            // unique (user_id, year, month) index
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicatePeriod,
                _ => AppError::from(e),
            }
        })?;

        Ok(PerformanceRecord::from(model))
    }

    async fn update(&self, id: Uuid, draft: RecordDraft) -> AppResult<PerformanceRecord> {
        let model = RecordEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        // Stamp the validation time on the draft -> validated transition,
        // keep it across validated -> validated rewrites
        let validated_at = match draft.status {
            RecordStatus::Validated => model.validated_at.or_else(|| Some(Utc::now())),
            RecordStatus::Draft => None,
        };

        let mut active: ActiveModel = model.into();
        apply_draft(&mut active, draft);
        active.validated_at = Set(validated_at);

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(PerformanceRecord::from(model))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: RecordFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<PerformanceRecord>, u64)> {
        let mut query = RecordEntity::find()
            .filter(performance_record::Column::UserId.eq(user_id));

        if let Some(year) = filter.year {
            query = query.filter(performance_record::Column::Year.eq(year));
        }
        if let Some(month) = filter.month {
            query = query.filter(performance_record::Column::Month.eq(month));
        }
        if let Some(status) = filter.status {
            query = query.filter(performance_record::Column::Status.eq(status.to_string()));
        }

        let paginator = query
            .order_by_desc(performance_record::Column::Year)
            .order_by_desc(performance_record::Column::Month)
            .paginate(&self.db, pagination.limit());

        let total = paginator.num_items().await.map_err(AppError::from)?;
        let records = paginator
            .fetch_page(pagination.page_index())
            .await
            .map_err(AppError::from)?;

        Ok((records.into_iter().map(PerformanceRecord::from).collect(), total))
    }

    async fn list_all(&self) -> AppResult<Vec<PerformanceRecord>> {
        let models = RecordEntity::find()
            .order_by_desc(performance_record::Column::Year)
            .order_by_desc(performance_record::Column::Month)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(PerformanceRecord::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = RecordEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn find_validated(
        &self,
        user_id: Uuid,
        year: i32,
        month: Option<i32>,
    ) -> AppResult<Vec<PerformanceRecord>> {
        let mut query = RecordEntity::find()
            .filter(performance_record::Column::UserId.eq(user_id))
            .filter(performance_record::Column::Status.eq(RecordStatus::Validated.to_string()))
            .filter(performance_record::Column::Year.eq(year));

        if let Some(month) = month {
            query = query.filter(performance_record::Column::Month.eq(month));
        }

        let models = query
            .order_by_desc(performance_record::Column::Month)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(PerformanceRecord::from).collect())
    }
}
