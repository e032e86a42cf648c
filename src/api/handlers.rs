//! Route handlers.

use super::{
    dto::{
        ConsumptionResponse, CreateTaskBody, HistoryResponse, IncidentBody, IncidentResponse,
        RecordConsumptionBody, ReportQuery, SetStatusBody, TaskListQuery, TaskResponse,
    },
    error::{ApiError, ApiResult},
    state::AppState,
};
use crate::activity::services::{RecordConsumptionRequest, ReportIncidentRequest};
use crate::task::{
    domain::{Assignee, TaskId, TaskState},
    ports::TaskFilter,
    services::{CreateTaskRequest, SetStatusRequest, TimeReport},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use mockable::Clock;
use serde_json::{Value, json};
use uuid::Uuid;

fn parse_task_id(raw: &str) -> ApiResult<TaskId> {
    Uuid::parse_str(raw)
        .map(TaskId::from_uuid)
        .map_err(|_| ApiError::bad_request(format!("invalid task id: {raw}")))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// `GET /health`.
#[expect(clippy::unused_async, reason = "axum handlers must be async")]
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// `GET /api/kanban/tasks`.
pub async fn list_tasks<C>(
    State(state): State<AppState<C>>,
    params: Result<Query<TaskListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskResponse>>>
where
    C: Clock + Send + Sync + 'static,
{
    let TaskListQuery { asignado_a, estado } = query(params)?;
    let mut filter = TaskFilter::all();
    if let Some(raw_assignee) = asignado_a {
        filter = filter.with_assignee(Assignee::new(raw_assignee)?);
    }
    if let Some(raw_state) = estado {
        filter = filter.with_state(TaskState::try_from(raw_state.as_str())?);
    }
    let views = state.tasks().list(&filter).await?;
    Ok(Json(views.into_iter().map(TaskResponse::from).collect()))
}

/// `POST /api/kanban/tasks`.
pub async fn create_task<C>(
    State(state): State<AppState<C>>,
    payload: Result<Json<CreateTaskBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)>
where
    C: Clock + Send + Sync + 'static,
{
    let CreateTaskBody {
        pedido_id,
        titulo,
        asignado_a,
        descripcion,
        area,
        prioridad,
    } = body(payload)?;
    let mut request = CreateTaskRequest::new(pedido_id, titulo, asignado_a);
    if let Some(text) = descripcion {
        request = request.with_description(text);
    }
    if let Some(value) = area {
        request = request.with_area(value);
    }
    if let Some(value) = prioridad {
        request = request.with_priority(value);
    }
    let view = state.tasks().create_task(request).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// `GET /api/kanban/tasks/{task_id}`.
pub async fn get_task<C>(
    State(state): State<AppState<C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<TaskResponse>>
where
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&raw_id)?;
    Ok(Json(state.tasks().find(task_id).await?.into()))
}

/// `POST /api/kanban/tasks/{task_id}/start`.
pub async fn start_task<C>(
    State(state): State<AppState<C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<TaskResponse>>
where
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&raw_id)?;
    Ok(Json(state.tasks().start(task_id).await?.into()))
}

/// `POST /api/kanban/tasks/{task_id}/pause`.
pub async fn pause_task<C>(
    State(state): State<AppState<C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<TaskResponse>>
where
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&raw_id)?;
    Ok(Json(state.tasks().pause(task_id).await?.into()))
}

/// `POST /api/kanban/tasks/{task_id}/finish`.
pub async fn finish_task<C>(
    State(state): State<AppState<C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<TaskResponse>>
where
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&raw_id)?;
    Ok(Json(state.tasks().finish(task_id).await?.into()))
}

/// `PUT /api/kanban/tasks/{task_id}/status`.
pub async fn set_status<C>(
    State(state): State<AppState<C>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<SetStatusBody>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>>
where
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&raw_id)?;
    let SetStatusBody { estado } = body(payload)?;
    let view = state
        .tasks()
        .set_status(SetStatusRequest::new(task_id, estado))
        .await?;
    Ok(Json(view.into()))
}

/// `GET /api/kanban/tasks/{task_id}/history`.
pub async fn task_history<C>(
    State(state): State<AppState<C>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<HistoryResponse>>
where
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&raw_id)?;
    Ok(Json(state.activity().history(task_id).await?.into()))
}

/// `POST /api/kanban/tasks/{task_id}/consumos`.
pub async fn record_consumption<C>(
    State(state): State<AppState<C>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<RecordConsumptionBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ConsumptionResponse>)>
where
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&raw_id)?;
    let RecordConsumptionBody {
        insumo_id,
        cantidad,
        motivo,
    } = body(payload)?;
    let record = state
        .activity()
        .record_consumption(RecordConsumptionRequest::new(
            task_id, insumo_id, cantidad, motivo,
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// `POST /api/kanban/tasks/{task_id}/incidencias`.
pub async fn report_incident<C>(
    State(state): State<AppState<C>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<IncidentBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IncidentResponse>)>
where
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&raw_id)?;
    let IncidentBody {
        tipo,
        urgencia,
        descripcion,
    } = body(payload)?;
    let record = state
        .activity()
        .report_incident(ReportIncidentRequest::new(
            task_id,
            tipo,
            urgencia,
            descripcion,
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// `GET /api/reports/tiempos`.
pub async fn time_report<C>(
    State(state): State<AppState<C>>,
    params: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<TimeReport>>
where
    C: Clock + Send + Sync + 'static,
{
    let ReportQuery { asignado_a } = query(params)?;
    let assignee = asignado_a.map(Assignee::new).transpose()?;
    Ok(Json(state.tasks().time_report(assignee).await?))
}
