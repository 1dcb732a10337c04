//! Performance record service tests.
//!
//! Run the upsert lifecycle, ownership checks and summary statistics
//! against an in-memory store that mirrors the SQL store's behavior,
//! including the (user, year, month) uniqueness guarantee.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use salestrack::domain::{PerformanceRecord, RecordDraft, RecordFilter, RecordStatus};
use salestrack::errors::{AppError, AppResult};
use salestrack::infra::{
    MockUserRepository, PerformanceRepository, UnitOfWork, UserRepository,
};
use salestrack::services::{PerformanceService, PerformanceTracker};
use salestrack::types::PaginationParams;

/// In-memory performance store with the same uniqueness behavior as the
/// SQL-backed one.
struct InMemoryRecords {
    rows: Mutex<Vec<PerformanceRecord>>,
    /// When set, period lookups always miss. This reproduces what the
    /// losing writer of a concurrent same-period upsert observes: its
    /// pre-insert lookup saw no row, and the unique index rejects the
    /// insert.
    blind_lookup: bool,
}

impl InMemoryRecords {
    fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            blind_lookup: false,
        }
    }

    fn racing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            blind_lookup: true,
        }
    }

    fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

fn materialize(user_id: Uuid, draft: RecordDraft) -> PerformanceRecord {
    let now = Utc::now();
    PerformanceRecord {
        id: Uuid::new_v4(),
        user_id,
        year: draft.year,
        month: draft.month,
        revenue: draft.revenue,
        revenue_target: draft.revenue_target,
        new_clients: draft.new_clients,
        appointments_completed: draft.appointments_completed,
        appointments_planned: draft.appointments_planned,
        sales_completed: draft.sales_completed,
        files_updated: draft.files_updated,
        total_files: draft.total_files,
        event_count: draft.event_count,
        satisfaction: draft.satisfaction,
        comment: draft.comment,
        status: draft.status,
        validated_at: (draft.status == RecordStatus::Validated).then_some(now),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl PerformanceRepository for InMemoryRecords {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PerformanceRecord>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_period(
        &self,
        user_id: Uuid,
        year: i32,
        month: i32,
    ) -> AppResult<Option<PerformanceRecord>> {
        if self.blind_lookup {
            return Ok(None);
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.year == year && r.month == month)
            .cloned())
    }

    async fn insert(&self, user_id: Uuid, draft: RecordDraft) -> AppResult<PerformanceRecord> {
        let mut rows = self.rows.lock().unwrap();
        let collision = rows
            .iter()
            .any(|r| r.user_id == user_id && r.year == draft.year && r.month == draft.month);
        if collision {
            return Err(AppError::DuplicatePeriod);
        }

        let record = materialize(user_id, draft);
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, draft: RecordDraft) -> AppResult<PerformanceRecord> {
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        record.validated_at = match draft.status {
            RecordStatus::Validated => record.validated_at.or(Some(now)),
            RecordStatus::Draft => None,
        };
        record.year = draft.year;
        record.month = draft.month;
        record.revenue = draft.revenue;
        record.revenue_target = draft.revenue_target;
        record.new_clients = draft.new_clients;
        record.appointments_completed = draft.appointments_completed;
        record.appointments_planned = draft.appointments_planned;
        record.sales_completed = draft.sales_completed;
        record.files_updated = draft.files_updated;
        record.total_files = draft.total_files;
        record.event_count = draft.event_count;
        record.satisfaction = draft.satisfaction;
        record.comment = draft.comment;
        record.status = draft.status;
        record.updated_at = now;

        Ok(record.clone())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: RecordFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<PerformanceRecord>, u64)> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<PerformanceRecord> = rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| filter.year.map_or(true, |y| r.year == y))
            .filter(|r| filter.month.map_or(true, |m| r.month == m))
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.year.cmp(&a.year).then(b.month.cmp(&a.month)));

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok((page, total))
    }

    async fn list_all(&self) -> AppResult<Vec<PerformanceRecord>> {
        let mut all: Vec<PerformanceRecord> = self.rows.lock().unwrap().clone();
        all.sort_by(|a, b| b.year.cmp(&a.year).then(b.month.cmp(&a.month)));
        Ok(all)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
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
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<PerformanceRecord> = rows
            .iter()
            .filter(|r| r.user_id == user_id && r.year == year)
            .filter(|r| r.status == RecordStatus::Validated)
            .filter(|r| month.map_or(true, |m| r.month == m))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.month.cmp(&a.month));
        Ok(matched)
    }
}

/// Test Unit of Work over the in-memory store
struct TestUnitOfWork {
    records: Arc<InMemoryRecords>,
    users: Arc<MockUserRepository>,
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn performance_records(&self) -> Arc<dyn PerformanceRepository> {
        self.records.clone()
    }
}

fn tracker(store: InMemoryRecords) -> (PerformanceTracker<TestUnitOfWork>, Arc<InMemoryRecords>) {
    let records = Arc::new(store);
    let uow = TestUnitOfWork {
        records: records.clone(),
        users: Arc::new(MockUserRepository::new()),
    };
    (PerformanceTracker::new(Arc::new(uow)), records)
}

fn draft(year: i32, month: i32) -> RecordDraft {
    RecordDraft {
        year,
        month,
        revenue: 10_000.0,
        revenue_target: 20_000.0,
        new_clients: 2,
        appointments_completed: 10,
        appointments_planned: 12,
        sales_completed: 4,
        files_updated: 5,
        total_files: 10,
        event_count: 1,
        satisfaction: 4,
        comment: None,
        status: RecordStatus::Draft,
    }
}

fn validated(year: i32, month: i32) -> RecordDraft {
    RecordDraft {
        status: RecordStatus::Validated,
        ..draft(year, month)
    }
}

// =============================================================================
// Upsert lifecycle
// =============================================================================

#[tokio::test]
async fn upsert_twice_keeps_one_record_per_period() {
    let (service, store) = tracker(InMemoryRecords::new());
    let user_id = Uuid::new_v4();

    let (first, was_created) = service.upsert(user_id, draft(2024, 3)).await.unwrap();
    assert!(was_created);

    let mut changed = draft(2024, 3);
    changed.revenue = 55_000.0;
    let (second, was_created) = service.upsert(user_id, changed).await.unwrap();

    assert!(!was_created);
    assert_eq!(second.id, first.id);
    assert_eq!(second.revenue, 55_000.0);
    assert_eq!(store.count(), 1);
}

#[tokio::test]
async fn upsert_for_distinct_periods_creates_distinct_records() {
    let (service, store) = tracker(InMemoryRecords::new());
    let user_id = Uuid::new_v4();

    service.upsert(user_id, draft(2024, 3)).await.unwrap();
    let (_, was_created) = service.upsert(user_id, draft(2024, 4)).await.unwrap();

    assert!(was_created);
    assert_eq!(store.count(), 2);
}

#[tokio::test]
async fn cross_field_violations_are_rejected_on_create_and_update() {
    let (service, store) = tracker(InMemoryRecords::new());
    let user_id = Uuid::new_v4();

    let mut invalid = draft(2024, 3);
    invalid.sales_completed = invalid.appointments_completed + 1;
    let result = service.upsert(user_id, invalid).await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    assert_eq!(store.count(), 0);

    // Same rejection on the update path, with the stored record untouched
    let (record, _) = service.upsert(user_id, draft(2024, 3)).await.unwrap();
    let mut invalid = draft(2024, 3);
    invalid.files_updated = invalid.total_files + 1;
    let result = service.upsert(user_id, invalid).await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));

    let stored = service.get_owned(user_id, record.id).await.unwrap();
    assert_eq!(stored.files_updated, record.files_updated);
}

#[tokio::test]
async fn losing_writer_of_a_period_race_gets_a_constraint_violation() {
    let (service, store) = tracker(InMemoryRecords::racing());
    let user_id = Uuid::new_v4();

    service.upsert(user_id, draft(2024, 3)).await.unwrap();
    let result = service.upsert(user_id, draft(2024, 3)).await;

    assert!(matches!(result.unwrap_err(), AppError::DuplicatePeriod));
    assert_eq!(store.count(), 1);
}

#[tokio::test]
async fn validation_timestamp_survives_validated_rewrites() {
    let (service, _) = tracker(InMemoryRecords::new());
    let user_id = Uuid::new_v4();

    let (record, _) = service.upsert(user_id, validated(2024, 3)).await.unwrap();
    let stamped = record.validated_at.unwrap();

    let mut rewrite = validated(2024, 3);
    rewrite.revenue = 99_000.0;
    let (record, _) = service.upsert(user_id, rewrite).await.unwrap();

    assert_eq!(record.validated_at.unwrap(), stamped);
}

// =============================================================================
// Ownership
// =============================================================================

#[tokio::test]
async fn non_owner_read_is_forbidden_not_hidden() {
    let (service, _) = tracker(InMemoryRecords::new());
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let (record, _) = service.upsert(owner, draft(2024, 3)).await.unwrap();

    let result = service.get_owned(stranger, record.id).await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn non_owner_delete_is_forbidden_and_keeps_the_record() {
    let (service, store) = tracker(InMemoryRecords::new());
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let (record, _) = service.upsert(owner, draft(2024, 3)).await.unwrap();

    let result = service.delete_owned(stranger, record.id).await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    assert_eq!(store.count(), 1);
}

#[tokio::test]
async fn owner_can_delete_their_record() {
    let (service, store) = tracker(InMemoryRecords::new());
    let owner = Uuid::new_v4();

    let (record, _) = service.upsert(owner, draft(2024, 3)).await.unwrap();
    service.delete_owned(owner, record.id).await.unwrap();

    assert_eq!(store.count(), 0);
    let result = service.get_owned(owner, record.id).await;
    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn listing_orders_by_period_descending_with_pagination() {
    let (service, _) = tracker(InMemoryRecords::new());
    let user_id = Uuid::new_v4();

    for (year, month) in [(2023, 11), (2024, 1), (2024, 6), (2023, 2)] {
        service.upsert(user_id, draft(year, month)).await.unwrap();
    }

    let (page, total) = service
        .list_for_user(
            user_id,
            RecordFilter::default(),
            PaginationParams::new(Some(1), Some(2)),
        )
        .await
        .unwrap();

    assert_eq!(total, 4);
    assert_eq!(page.len(), 2);
    assert_eq!((page[0].year, page[0].month), (2024, 6));
    assert_eq!((page[1].year, page[1].month), (2024, 1));

    let (page, _) = service
        .list_for_user(
            user_id,
            RecordFilter::default(),
            PaginationParams::new(Some(2), Some(2)),
        )
        .await
        .unwrap();

    assert_eq!((page[0].year, page[0].month), (2023, 11));
    assert_eq!((page[1].year, page[1].month), (2023, 2));
}

#[tokio::test]
async fn listing_filters_by_year_and_status() {
    let (service, _) = tracker(InMemoryRecords::new());
    let user_id = Uuid::new_v4();

    service.upsert(user_id, draft(2023, 12)).await.unwrap();
    service.upsert(user_id, validated(2024, 1)).await.unwrap();
    service.upsert(user_id, draft(2024, 2)).await.unwrap();

    let filter = RecordFilter {
        year: Some(2024),
        month: None,
        status: Some(RecordStatus::Validated),
    };
    let (page, total) = service
        .list_for_user(user_id, filter, PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!((page[0].year, page[0].month), (2024, 1));
}

#[tokio::test]
async fn list_all_spans_users() {
    let (service, _) = tracker(InMemoryRecords::new());

    service.upsert(Uuid::new_v4(), draft(2024, 3)).await.unwrap();
    service.upsert(Uuid::new_v4(), draft(2024, 5)).await.unwrap();

    let all = service.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].month, 5);
}

// =============================================================================
// Summary statistics
// =============================================================================

#[tokio::test]
async fn summary_without_validated_records_is_all_zero() {
    let (service, _) = tracker(InMemoryRecords::new());
    let user_id = Uuid::new_v4();

    // Draft records never count toward the summary
    service.upsert(user_id, draft(2024, 3)).await.unwrap();

    let summary = service.summarize(user_id, 2024, None).await.unwrap();

    assert_eq!(summary.count, 0);
    assert_eq!(summary.total_revenue, 0.0);
    assert_eq!(summary.avg_satisfaction, 0.0);
    assert_eq!(summary.conversion_rate, 0);
    assert_eq!(summary.target_attainment_rate, 0);
}

#[tokio::test]
async fn summary_totals_and_rates_over_validated_records() {
    let (service, _) = tracker(InMemoryRecords::new());
    let user_id = Uuid::new_v4();

    let mut january = validated(2024, 1);
    january.revenue = 40_000.0;
    january.revenue_target = 50_000.0;
    january.appointments_completed = 25;
    january.sales_completed = 10;
    january.satisfaction = 5;
    service.upsert(user_id, january).await.unwrap();

    let mut february = validated(2024, 2);
    february.revenue = 50_000.0;
    february.revenue_target = 50_000.0;
    february.appointments_completed = 15;
    february.sales_completed = 10;
    february.satisfaction = 4;
    service.upsert(user_id, february).await.unwrap();

    // Excluded: draft status, other year, other user
    service.upsert(user_id, draft(2024, 3)).await.unwrap();
    service.upsert(user_id, validated(2023, 12)).await.unwrap();
    service.upsert(Uuid::new_v4(), validated(2024, 1)).await.unwrap();

    let summary = service.summarize(user_id, 2024, None).await.unwrap();

    assert_eq!(summary.count, 2);
    assert_eq!(summary.total_revenue, 90_000.0);
    assert_eq!(summary.total_target, 100_000.0);
    assert_eq!(summary.total_appointments, 40);
    assert_eq!(summary.total_sales, 20);
    assert_eq!(summary.conversion_rate, 50);
    assert_eq!(summary.target_attainment_rate, 90);
    assert_eq!(summary.avg_satisfaction, 4.5);
}

#[tokio::test]
async fn summary_can_narrow_to_one_month() {
    let (service, _) = tracker(InMemoryRecords::new());
    let user_id = Uuid::new_v4();

    let mut january = validated(2024, 1);
    january.revenue = 40_000.0;
    service.upsert(user_id, january).await.unwrap();

    let mut february = validated(2024, 2);
    february.revenue = 50_000.0;
    service.upsert(user_id, february).await.unwrap();

    let summary = service.summarize(user_id, 2024, Some(2)).await.unwrap();

    assert_eq!(summary.count, 1);
    assert_eq!(summary.total_revenue, 50_000.0);
}
