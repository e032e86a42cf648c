//! `PostgreSQL` implementation of the activity log.

use super::{
    models::{ConsumptionRow, IncidentRow},
    schema::{consumptions, incidents},
};
use crate::activity::{
    domain::{
        ActivityId, Consumption, Incident, IncidentKind, PersistedConsumptionData,
        PersistedIncidentData, SupplyId, TaskHistory, Urgency,
    },
    ports::{ActivityLog, ActivityLogError, ActivityLogResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the activity log.
pub type ActivityPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed activity log.
///
/// The `task_id` foreign keys reject records for unknown tasks.
#[derive(Debug, Clone)]
pub struct PostgresActivityLog {
    pool: ActivityPgPool,
}

impl PostgresActivityLog {
    /// Creates a new log from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ActivityPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ActivityLogResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ActivityLogResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ActivityLogError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ActivityLogError::persistence)?
    }
}

fn map_insert_error(task_id: TaskId) -> impl FnOnce(DieselError) -> ActivityLogError {
    move |err| match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            ActivityLogError::UnknownTask(task_id)
        }
        _ => ActivityLogError::persistence(err),
    }
}

#[async_trait]
impl ActivityLog for PostgresActivityLog {
    async fn record_consumption(&self, consumption: &Consumption) -> ActivityLogResult<()> {
        let task_id = consumption.task_id();
        let row = ConsumptionRow {
            id: consumption.id().into_inner(),
            task_id: task_id.into_inner(),
            supply_id: consumption.supply_id().value(),
            quantity: i32::try_from(consumption.quantity())
                .map_err(ActivityLogError::persistence)?,
            reason: consumption.reason().to_owned(),
            recorded_at: consumption.recorded_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(consumptions::table)
                .values(&row)
                .execute(connection)
                .map_err(map_insert_error(task_id))?;
            Ok(())
        })
        .await
    }

    async fn record_incident(&self, incident: &Incident) -> ActivityLogResult<()> {
        let task_id = incident.task_id();
        let row = IncidentRow {
            id: incident.id().into_inner(),
            task_id: task_id.into_inner(),
            kind: incident.kind().as_str().to_owned(),
            urgency: incident.urgency().as_str().to_owned(),
            description: incident.description().to_owned(),
            reported_at: incident.reported_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(incidents::table)
                .values(&row)
                .execute(connection)
                .map_err(map_insert_error(task_id))?;
            Ok(())
        })
        .await
    }

    async fn history(&self, task_id: TaskId) -> ActivityLogResult<TaskHistory> {
        self.run_blocking(move |connection| {
            let consumption_rows = consumptions::table
                .filter(consumptions::task_id.eq(task_id.into_inner()))
                .order((consumptions::recorded_at.asc(), consumptions::id.asc()))
                .select(ConsumptionRow::as_select())
                .load::<ConsumptionRow>(connection)
                .map_err(ActivityLogError::persistence)?;
            let incident_rows = incidents::table
                .filter(incidents::task_id.eq(task_id.into_inner()))
                .order((incidents::reported_at.asc(), incidents::id.asc()))
                .select(IncidentRow::as_select())
                .load::<IncidentRow>(connection)
                .map_err(ActivityLogError::persistence)?;

            Ok(TaskHistory {
                consumos: consumption_rows
                    .into_iter()
                    .map(row_to_consumption)
                    .collect::<ActivityLogResult<_>>()?,
                incidencias: incident_rows
                    .into_iter()
                    .map(row_to_incident)
                    .collect::<ActivityLogResult<_>>()?,
            })
        })
        .await
    }
}

fn row_to_consumption(row: ConsumptionRow) -> ActivityLogResult<Consumption> {
    Ok(Consumption::from_persisted(PersistedConsumptionData {
        id: ActivityId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        supply_id: SupplyId::new(row.supply_id).map_err(ActivityLogError::persistence)?,
        quantity: u32::try_from(row.quantity).map_err(ActivityLogError::persistence)?,
        reason: row.reason,
        recorded_at: row.recorded_at,
    }))
}

fn row_to_incident(row: IncidentRow) -> ActivityLogResult<Incident> {
    Ok(Incident::from_persisted(PersistedIncidentData {
        id: ActivityId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        kind: IncidentKind::try_from(row.kind.as_str()).map_err(ActivityLogError::persistence)?,
        urgency: Urgency::try_from(row.urgency.as_str()).map_err(ActivityLogError::persistence)?,
        description: row.description,
        reported_at: row.reported_at,
    }))
}
