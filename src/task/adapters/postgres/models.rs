//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning order.
    pub order_id: i64,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Shop area.
    pub area: String,
    /// Priority label.
    pub priority: String,
    /// Assigned operator.
    pub assignee: String,
    /// Board state label.
    pub state: String,
    /// Start of the open running interval.
    pub started_at: Option<DateTime<Utc>>,
    /// Ledger in seconds.
    pub accumulated_seconds: i64,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning order.
    pub order_id: i64,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Shop area.
    pub area: String,
    /// Priority label.
    pub priority: String,
    /// Assigned operator.
    pub assignee: String,
    /// Board state label.
    pub state: String,
    /// Start of the open running interval.
    pub started_at: Option<DateTime<Utc>>,
    /// Ledger in seconds.
    pub accumulated_seconds: i64,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle columns written by a state change.
///
/// `started_at` must be cleared explicitly on pause and finish, hence
/// `treat_none_as_null`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskLifecycleChangeset {
    /// Board state label.
    pub state: String,
    /// Start of the open running interval.
    pub started_at: Option<DateTime<Utc>>,
    /// Ledger in seconds.
    pub accumulated_seconds: i64,
    /// New revision.
    pub revision: i64,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}
