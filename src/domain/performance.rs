//! Monthly performance record entity, write drafts and summary statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    MAX_COMMENT_LENGTH, MAX_RECORD_YEAR, MAX_SATISFACTION, MIN_RECORD_YEAR, MIN_SATISFACTION,
    RECORD_STATUS_DRAFT, RECORD_STATUS_VALIDATED,
};
use crate::errors::{AppError, AppResult};

/// Record workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Draft,
    Validated,
}

impl From<&str> for RecordStatus {
    fn from(s: &str) -> Self {
        match s {
            RECORD_STATUS_VALIDATED => RecordStatus::Validated,
            _ => RecordStatus::Draft,
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Draft => write!(f, "{}", RECORD_STATUS_DRAFT),
            RecordStatus::Validated => write!(f, "{}", RECORD_STATUS_VALIDATED),
        }
    }
}

/// One employee's metrics for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
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
    pub status: RecordStatus,
    pub validated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rounded integer percentage, 0 when the denominator is 0
fn percent(part: f64, whole: f64) -> i64 {
    if whole <= 0.0 {
        return 0;
    }
    (part * 100.0 / whole).round() as i64
}

impl PerformanceRecord {
    /// Sales per completed appointment, as a rounded percentage
    pub fn conversion_rate(&self) -> i64 {
        percent(self.sales_completed as f64, self.appointments_completed as f64)
    }

    /// Updated files per total file, as a rounded percentage
    pub fn completion_rate(&self) -> i64 {
        percent(self.files_updated as f64, self.total_files as f64)
    }

    /// Revenue against target, as a rounded percentage
    pub fn target_attainment_rate(&self) -> i64 {
        percent(self.revenue, self.revenue_target)
    }
}

/// Validated field set for an upsert, keyed by (user, year, month)
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
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
    pub status: RecordStatus,
}

impl RecordDraft {
    /// Run the full validation stage before any store mutation.
    ///
    /// Collects every violation so the caller gets field-level detail in
    /// one response.
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();

        if self.year < MIN_RECORD_YEAR || self.year > MAX_RECORD_YEAR {
            errors.push(format!(
                "year must be between {} and {}",
                MIN_RECORD_YEAR, MAX_RECORD_YEAR
            ));
        }
        if !(1..=12).contains(&self.month) {
            errors.push("month must be between 1 and 12".to_string());
        }
        if self.revenue < 0.0 {
            errors.push("revenue cannot be negative".to_string());
        }
        if self.revenue_target < 0.0 {
            errors.push("revenue_target cannot be negative".to_string());
        }
        for (name, value) in [
            ("new_clients", self.new_clients),
            ("appointments_completed", self.appointments_completed),
            ("appointments_planned", self.appointments_planned),
            ("sales_completed", self.sales_completed),
            ("files_updated", self.files_updated),
            ("total_files", self.total_files),
            ("event_count", self.event_count),
        ] {
            if value < 0 {
                errors.push(format!("{} cannot be negative", name));
            }
        }
        if self.satisfaction < MIN_SATISFACTION || self.satisfaction > MAX_SATISFACTION {
            errors.push(format!(
                "satisfaction must be between {} and {}",
                MIN_SATISFACTION, MAX_SATISFACTION
            ));
        }
        if let Some(comment) = &self.comment {
            if comment.chars().count() as u64 > MAX_COMMENT_LENGTH {
                errors.push(format!("comment cannot exceed {} characters", MAX_COMMENT_LENGTH));
            }
        }
        if self.sales_completed > self.appointments_completed {
            errors.push("sales_completed cannot exceed appointments_completed".to_string());
        }
        if self.files_updated > self.total_files {
            errors.push("files_updated cannot exceed total_files".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Filters for the per-user record listing
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub status: Option<RecordStatus>,
}

/// Record view with derived rates (computed, never stored)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PerformanceResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 3)]
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
    pub validated_at: Option<DateTime<Utc>>,
    /// Sales per completed appointment, percent
    pub conversion_rate: i64,
    /// Updated files per total file, percent
    pub completion_rate: i64,
    /// Revenue against target, percent
    pub target_attainment_rate: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PerformanceRecord> for PerformanceResponse {
    fn from(record: PerformanceRecord) -> Self {
        let conversion_rate = record.conversion_rate();
        let completion_rate = record.completion_rate();
        let target_attainment_rate = record.target_attainment_rate();
        Self {
            id: record.id,
            user_id: record.user_id,
            year: record.year,
            month: record.month,
            revenue: record.revenue,
            revenue_target: record.revenue_target,
            new_clients: record.new_clients,
            appointments_completed: record.appointments_completed,
            appointments_planned: record.appointments_planned,
            sales_completed: record.sales_completed,
            files_updated: record.files_updated,
            total_files: record.total_files,
            event_count: record.event_count,
            satisfaction: record.satisfaction,
            comment: record.comment,
            status: record.status.to_string(),
            validated_at: record.validated_at,
            conversion_rate,
            completion_rate,
            target_attainment_rate,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Aggregate view over a user's validated records
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PerformanceSummary {
    pub total_revenue: f64,
    pub total_target: f64,
    pub total_new_clients: i64,
    pub total_appointments: i64,
    pub total_sales: i64,
    pub total_events: i64,
    /// Mean satisfaction score, rounded to two decimals
    pub avg_satisfaction: f64,
    pub count: u64,
    pub conversion_rate: i64,
    pub target_attainment_rate: i64,
}

impl PerformanceSummary {
    /// All-zero summary, returned when no records match
    pub fn empty() -> Self {
        Self {
            total_revenue: 0.0,
            total_target: 0.0,
            total_new_clients: 0,
            total_appointments: 0,
            total_sales: 0,
            total_events: 0,
            avg_satisfaction: 0.0,
            count: 0,
            conversion_rate: 0,
            target_attainment_rate: 0,
        }
    }

    /// Aggregate a set of records into summary statistics
    pub fn from_records(records: &[PerformanceRecord]) -> Self {
        if records.is_empty() {
            return Self::empty();
        }

        let mut summary = Self::empty();
        let mut satisfaction_sum: i64 = 0;

        for record in records {
            summary.total_revenue += record.revenue;
            summary.total_target += record.revenue_target;
            summary.total_new_clients += record.new_clients as i64;
            summary.total_appointments += record.appointments_completed as i64;
            summary.total_sales += record.sales_completed as i64;
            summary.total_events += record.event_count as i64;
            satisfaction_sum += record.satisfaction as i64;
        }

        summary.count = records.len() as u64;
        summary.avg_satisfaction =
            ((satisfaction_sum as f64 / records.len() as f64) * 100.0).round() / 100.0;
        summary.conversion_rate = percent(
            summary.total_sales as f64,
            summary.total_appointments as f64,
        );
        summary.target_attainment_rate = percent(summary.total_revenue, summary.total_target);

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(year: i32, month: i32) -> PerformanceRecord {
        let now = Utc::now();
        PerformanceRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            year,
            month,
            revenue: 0.0,
            revenue_target: 0.0,
            new_clients: 0,
            appointments_completed: 0,
            appointments_planned: 0,
            sales_completed: 0,
            files_updated: 0,
            total_files: 0,
            event_count: 0,
            satisfaction: 4,
            comment: None,
            status: RecordStatus::Validated,
            validated_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_draft() -> RecordDraft {
        RecordDraft {
            year: 2024,
            month: 3,
            revenue: 1000.0,
            revenue_target: 2000.0,
            new_clients: 1,
            appointments_completed: 10,
            appointments_planned: 12,
            sales_completed: 5,
            files_updated: 3,
            total_files: 8,
            event_count: 0,
            satisfaction: 4,
            comment: None,
            status: RecordStatus::Draft,
        }
    }

    #[test]
    fn conversion_rate_rounds_to_whole_percent() {
        let mut record = sample_record(2024, 3);
        record.appointments_completed = 40;
        record.sales_completed = 20;
        assert_eq!(record.conversion_rate(), 50);

        record.appointments_completed = 3;
        record.sales_completed = 1;
        assert_eq!(record.conversion_rate(), 33);
    }

    #[test]
    fn rates_are_zero_without_denominator() {
        let record = sample_record(2024, 3);
        assert_eq!(record.conversion_rate(), 0);
        assert_eq!(record.completion_rate(), 0);
        assert_eq!(record.target_attainment_rate(), 0);
    }

    #[test]
    fn target_attainment_example() {
        let mut record = sample_record(2024, 3);
        record.revenue = 90_000.0;
        record.revenue_target = 100_000.0;
        assert_eq!(record.target_attainment_rate(), 90);
    }

    #[test]
    fn draft_accepts_valid_input() {
        assert!(sample_draft().validate().is_ok());
    }

    #[test]
    fn draft_rejects_sales_above_appointments() {
        let mut draft = sample_draft();
        draft.sales_completed = 11;
        let err = draft.validate().unwrap_err();
        match err {
            AppError::Validation(messages) => {
                assert!(messages.iter().any(|m| m.contains("sales_completed")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn draft_rejects_files_above_total() {
        let mut draft = sample_draft();
        draft.files_updated = 9;
        assert!(draft.validate().is_err());
    }

    #[test]
    fn draft_rejects_out_of_range_period() {
        let mut draft = sample_draft();
        draft.year = 2019;
        draft.month = 13;
        let err = draft.validate().unwrap_err();
        match err {
            AppError::Validation(messages) => assert_eq!(messages.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn summary_of_no_records_is_all_zero() {
        let summary = PerformanceSummary::from_records(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.conversion_rate, 0);
        assert_eq!(summary.target_attainment_rate, 0);
        assert_eq!(summary.avg_satisfaction, 0.0);
    }

    #[test]
    fn summary_aggregates_totals_and_rates() {
        let mut first = sample_record(2024, 1);
        first.revenue = 40_000.0;
        first.revenue_target = 50_000.0;
        first.appointments_completed = 25;
        first.sales_completed = 10;
        first.satisfaction = 5;

        let mut second = sample_record(2024, 2);
        second.revenue = 50_000.0;
        second.revenue_target = 50_000.0;
        second.appointments_completed = 15;
        second.sales_completed = 10;
        second.satisfaction = 4;

        let summary = PerformanceSummary::from_records(&[first, second]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_revenue, 90_000.0);
        assert_eq!(summary.total_appointments, 40);
        assert_eq!(summary.total_sales, 20);
        assert_eq!(summary.conversion_rate, 50);
        assert_eq!(summary.target_attainment_rate, 90);
        assert_eq!(summary.avg_satisfaction, 4.5);
    }
}
