//! JSON HTTP surface for the Kanban board.
//!
//! Field names follow the board's Spanish vocabulary (`titulo`, `estado`,
//! `tiempo_acumulado`, ...). Every error body has the shape
//! `{"error": "<message>"}`.

mod dto;
mod error;
mod handlers;
mod router;
mod state;

pub use dto::{
    ConsumptionResponse, CreateTaskBody, HistoryResponse, IncidentBody, IncidentResponse,
    RecordConsumptionBody, ReportQuery, SetStatusBody, TaskListQuery, TaskResponse,
};
pub use error::{ApiError, ApiResult};
pub use router::{RouterSetupError, cors_layer, router};
pub use state::{AppState, BoardActivityService, BoardTaskService};
