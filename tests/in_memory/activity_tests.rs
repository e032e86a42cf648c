//! In-memory integration tests for the activity log.

use std::sync::Arc;

use carpenter::activity::{
    adapters::memory::InMemoryActivityLog,
    domain::Urgency,
    services::{ActivityService, RecordConsumptionRequest, ReportIncidentRequest},
};
use carpenter::task::domain::TaskId;
use eyre::{Result, ensure};
use mockable::Clock;
use rstest::rstest;

use crate::test_helpers::ManualClock;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_is_chronological_and_stamped_by_the_clock() -> Result<()> {
    let clock = ManualClock::default();
    let service = ActivityService::new(
        Arc::new(InMemoryActivityLog::new()),
        Arc::new(clock.clone()),
    );
    let task_id = TaskId::new();

    service
        .report_incident(ReportIncidentRequest::new(task_id, "faltante", "baja", "Faltan bisagras"))
        .await?;
    clock.advance(60);
    service
        .record_consumption(RecordConsumptionRequest::new(task_id, 12, 4, "ensamble"))
        .await?;
    clock.advance(60);
    service
        .report_incident(ReportIncidentRequest::new(task_id, "equipo", "alta", "Taladro averiado"))
        .await?;

    let history = service.history(task_id).await?;
    let reported: Vec<_> = history.incidencias.iter().map(|record| record.reported_at()).collect();
    let urgencies: Vec<Urgency> = history
        .incidencias
        .iter()
        .map(|record| record.urgency())
        .collect();

    ensure!(history.consumos.len() == 1, "expected one consumption");
    ensure!(reported.windows(2).all(|pair| pair.first() < pair.get(1)), "incidents out of order");
    ensure!(urgencies == [Urgency::Low, Urgency::High], "unexpected urgencies {urgencies:?}");
    ensure!(
        history.consumos.iter().all(|record| record.recorded_at() < clock.utc()),
        "consumption must be stamped before the last report"
    );
    Ok(())
}
