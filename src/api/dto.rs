//! Request and response bodies.

use crate::activity::domain::{
    ActivityId, Consumption, Incident, IncidentKind, TaskHistory, Urgency,
};
use crate::task::{
    domain::{TaskId, TaskState, format_hms},
    services::TaskView,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Board card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task identifier.
    pub task_id: TaskId,
    /// Owning order.
    pub pedido_id: i64,
    /// Title.
    pub titulo: String,
    /// Optional description.
    pub descripcion: Option<String>,
    /// Shop area.
    pub area: String,
    /// Priority label.
    pub prioridad: String,
    /// Assigned operator.
    pub asignado_a: String,
    /// Board column.
    pub estado: TaskState,
    /// Start of the open running interval.
    pub inicio: Option<DateTime<Utc>>,
    /// Closed running time in seconds.
    pub tiempo_acumulado: u64,
    /// Tracked time at `observed_at`, including the open interval.
    pub elapsed_seconds: u64,
    /// `elapsed_seconds` as `hh:mm:ss`.
    pub elapsed_display: String,
    /// Server time the elapsed values were computed for.
    pub observed_at: DateTime<Utc>,
    /// Optimistic concurrency revision.
    pub revision: u64,
    /// Order client, when the order is known.
    pub nombre_cliente: Option<String>,
    /// Order commitment date, when set.
    pub fecha_compromiso: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<TaskView> for TaskResponse {
    fn from(view: TaskView) -> Self {
        let elapsed_seconds = view.elapsed_seconds();
        let observed_at = view.observed_at();
        let nombre_cliente = view.order().map(|order| order.client_name().to_owned());
        let fecha_compromiso = view.order().and_then(|order| order.commitment_date());
        let task = view.into_task();
        let details = task.details();
        Self {
            task_id: task.id(),
            pedido_id: task.order_id().value(),
            titulo: details.title().to_owned(),
            descripcion: details.description().map(str::to_owned),
            area: details.area().to_owned(),
            prioridad: details.priority().to_owned(),
            asignado_a: task.assignee().as_str().to_owned(),
            estado: task.state(),
            inicio: task.started_at(),
            tiempo_acumulado: task.accumulated_seconds(),
            elapsed_seconds,
            elapsed_display: format_hms(elapsed_seconds),
            observed_at,
            revision: task.revision(),
            nombre_cliente,
            fecha_compromiso,
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Body of `POST /api/kanban/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskBody {
    /// Owning order.
    pub pedido_id: i64,
    /// Title.
    pub titulo: String,
    /// Assigned operator.
    pub asignado_a: String,
    /// Optional description.
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Shop area; defaults to the order's.
    #[serde(default)]
    pub area: Option<String>,
    /// Priority; defaults to the order's.
    #[serde(default)]
    pub prioridad: Option<String>,
}

/// Body of `PUT /api/kanban/tasks/{task_id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStatusBody {
    /// Target column label.
    pub estado: String,
}

/// Query of `GET /api/kanban/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListQuery {
    /// Only tasks of this operator.
    #[serde(default)]
    pub asignado_a: Option<String>,
    /// Only tasks in this column.
    #[serde(default)]
    pub estado: Option<String>,
}

/// Query of `GET /api/reports/tiempos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Only tasks of this operator.
    #[serde(default)]
    pub asignado_a: Option<String>,
}

/// Body of `POST /api/kanban/tasks/{task_id}/consumos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConsumptionBody {
    /// Consumed supply.
    pub insumo_id: i64,
    /// Consumed units.
    pub cantidad: u32,
    /// Reason label.
    pub motivo: String,
}

/// Body of `POST /api/kanban/tasks/{task_id}/incidencias`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentBody {
    /// `faltante`, `defecto` or `equipo`.
    pub tipo: String,
    /// `baja`, `media` or `alta`.
    pub urgencia: String,
    /// Description.
    pub descripcion: String,
}

/// Consumption record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionResponse {
    /// Record identifier.
    pub id: ActivityId,
    /// Task the supply was used for.
    pub task_id: TaskId,
    /// Consumed supply.
    pub insumo_id: i64,
    /// Consumed units.
    pub cantidad: u32,
    /// Reason label.
    pub motivo: String,
    /// Recording time.
    pub fecha: DateTime<Utc>,
}

impl From<Consumption> for ConsumptionResponse {
    fn from(record: Consumption) -> Self {
        Self {
            id: record.id(),
            task_id: record.task_id(),
            insumo_id: record.supply_id().value(),
            cantidad: record.quantity(),
            motivo: record.reason().to_owned(),
            fecha: record.recorded_at(),
        }
    }
}

/// Incident record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentResponse {
    /// Record identifier.
    pub id: ActivityId,
    /// Affected task.
    pub task_id: TaskId,
    /// Category.
    pub tipo: IncidentKind,
    /// Urgency.
    pub urgencia: Urgency,
    /// Description.
    pub descripcion: String,
    /// Report time.
    pub fecha: DateTime<Utc>,
}

impl From<Incident> for IncidentResponse {
    fn from(record: Incident) -> Self {
        Self {
            id: record.id(),
            task_id: record.task_id(),
            tipo: record.kind(),
            urgencia: record.urgency(),
            descripcion: record.description().to_owned(),
            fecha: record.reported_at(),
        }
    }
}

/// Activity history of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Consumption records, oldest first.
    pub consumos: Vec<ConsumptionResponse>,
    /// Incident records, oldest first.
    pub incidencias: Vec<IncidentResponse>,
}

impl From<TaskHistory> for HistoryResponse {
    fn from(history: TaskHistory) -> Self {
        Self {
            consumos: history.consumos.into_iter().map(Into::into).collect(),
            incidencias: history.incidencias.into_iter().map(Into::into).collect(),
        }
    }
}
