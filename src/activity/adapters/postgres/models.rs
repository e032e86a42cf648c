//! Diesel row models for activity records.

use super::schema::{consumptions, incidents};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query and insert row for consumptions.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = consumptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConsumptionRow {
    /// Record identifier.
    pub id: Uuid,
    /// Task reference.
    pub task_id: Uuid,
    /// Supply reference.
    pub supply_id: i64,
    /// Consumed units.
    pub quantity: i32,
    /// Reason label.
    pub reason: String,
    /// Recording timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Query and insert row for incidents.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = incidents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IncidentRow {
    /// Record identifier.
    pub id: Uuid,
    /// Task reference.
    pub task_id: Uuid,
    /// Incident category label.
    pub kind: String,
    /// Urgency label.
    pub urgency: String,
    /// Description.
    pub description: String,
    /// Report timestamp.
    pub reported_at: DateTime<Utc>,
}
