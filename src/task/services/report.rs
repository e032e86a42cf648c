//! Time-tracking report over finished tasks.

use crate::task::domain::{Assignee, Task, TaskId, TaskState};
use serde::Serialize;
use std::collections::BTreeMap;

/// One finished task in the report detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeReportRow {
    /// Finished task.
    pub task_id: TaskId,
    /// Task title.
    pub titulo: String,
    /// Operator who executed the task.
    pub operario: Assignee,
    /// Tracked seconds.
    pub tiempo_acumulado: u64,
}

/// Per-operator aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorTimeSummary {
    /// Operator.
    pub operario: Assignee,
    /// Number of finished tasks.
    pub tareas_completadas: u64,
    /// Sum of tracked seconds.
    pub total_seg: u64,
    /// Mean tracked seconds per task, truncated.
    pub promedio_seg: u64,
}

/// Time report: per-task detail and per-operator summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeReport {
    /// Per-operator summary, fastest average first.
    pub resumen: Vec<OperatorTimeSummary>,
    /// Finished tasks in the order they were supplied.
    pub detalle: Vec<TimeReportRow>,
}

impl TimeReport {
    /// Builds the report from a task list, ignoring unfinished tasks.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let detalle: Vec<TimeReportRow> = tasks
            .into_iter()
            .filter(|task| task.state() == TaskState::Done)
            .map(|task| TimeReportRow {
                task_id: task.id(),
                titulo: task.details().title().to_owned(),
                operario: task.assignee().clone(),
                tiempo_acumulado: task.accumulated_seconds(),
            })
            .collect();

        let mut totals: BTreeMap<&Assignee, (u64, u64)> = BTreeMap::new();
        for row in &detalle {
            let entry = totals.entry(&row.operario).or_default();
            entry.0 = entry.0.saturating_add(1);
            entry.1 = entry.1.saturating_add(row.tiempo_acumulado);
        }

        let mut resumen: Vec<OperatorTimeSummary> = totals
            .into_iter()
            .map(|(operario, (count, total))| OperatorTimeSummary {
                operario: operario.clone(),
                tareas_completadas: count,
                total_seg: total,
                promedio_seg: total.checked_div(count).unwrap_or(0),
            })
            .collect();
        // BTreeMap iteration already orders by name; a stable sort keeps it
        // as the tie-breaker.
        resumen.sort_by_key(|summary| summary.promedio_seg);

        Self { resumen, detalle }
    }
}
