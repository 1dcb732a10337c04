//! Performance record service: upsert-by-period lifecycle, listings,
//! ownership checks and summary statistics.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    PerformanceRecord, PerformanceSummary, RecordDraft, RecordFilter,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Performance record use cases.
#[async_trait]
pub trait PerformanceService: Send + Sync {
    /// Create or update the caller's record for the draft's period.
    /// Returns the stored record and whether it was newly created.
    async fn upsert(
        &self,
        user_id: Uuid,
        draft: RecordDraft,
    ) -> AppResult<(PerformanceRecord, bool)>;

    /// The caller's records, filtered and paginated, with total count
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: RecordFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<PerformanceRecord>, u64)>;

    /// Every record across all users (role-gated by the caller)
    async fn list_all(&self) -> AppResult<Vec<PerformanceRecord>>;

    /// Fetch a single record, owner-only
    async fn get_owned(&self, caller: Uuid, id: Uuid) -> AppResult<PerformanceRecord>;

    /// Delete a single record, owner-only
    async fn delete_owned(&self, caller: Uuid, id: Uuid) -> AppResult<()>;

    /// Summary statistics over the user's validated records
    async fn summarize(
        &self,
        user_id: Uuid,
        year: i32,
        month: Option<i32>,
    ) -> AppResult<PerformanceSummary>;
}

/// PerformanceService over the persistence UnitOfWork.
pub struct PerformanceTracker<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PerformanceTracker<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> PerformanceService for PerformanceTracker<U> {
    async fn upsert(
        &self,
        user_id: Uuid,
        draft: RecordDraft,
    ) -> AppResult<(PerformanceRecord, bool)> {
        // Validation stage runs before any store mutation, on both the
        // create and the update path
        draft.validate()?;

        let records = self.uow.performance_records();
        match records
            .find_by_period(user_id, draft.year, draft.month)
            .await?
        {
            Some(existing) => {
                let record = records.update(existing.id, draft).await?;
                Ok((record, false))
            }
            None => {
                let record = records.insert(user_id, draft).await?;
                tracing::debug!(user_id = %user_id, year = record.year, month = record.month, "record created");
                Ok((record, true))
            }
        }
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: RecordFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<PerformanceRecord>, u64)> {
        self.uow
            .performance_records()
            .list_for_user(user_id, filter, pagination)
            .await
    }

    async fn list_all(&self) -> AppResult<Vec<PerformanceRecord>> {
        self.uow.performance_records().list_all().await
    }

    async fn get_owned(&self, caller: Uuid, id: Uuid) -> AppResult<PerformanceRecord> {
        let record = self
            .uow
            .performance_records()
            .find_by_id(id)
            .await?
            .ok_or_not_found()?;

        if record.user_id != caller {
            return Err(AppError::Forbidden);
        }

        Ok(record)
    }

    async fn delete_owned(&self, caller: Uuid, id: Uuid) -> AppResult<()> {
        // Ownership check first; access is denied rather than hidden
        // behind NotFound
        self.get_owned(caller, id).await?;
        self.uow.performance_records().delete(id).await
    }

    async fn summarize(
        &self,
        user_id: Uuid,
        year: i32,
        month: Option<i32>,
    ) -> AppResult<PerformanceSummary> {
        let records = self
            .uow
            .performance_records()
            .find_validated(user_id, year, month)
            .await?;

        Ok(PerformanceSummary::from_records(&records))
    }
}
