//! Diesel row models for order lookups.

use super::schema::orders;
use chrono::NaiveDate;
use diesel::prelude::*;

/// Query result row for order summaries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    /// Order identifier.
    pub id: i64,
    /// Client display name.
    pub client_name: String,
    /// Shop area.
    pub area: String,
    /// Priority label.
    pub priority: String,
    /// Committed delivery date.
    pub commitment_date: Option<NaiveDate>,
}
