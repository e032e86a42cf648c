//! Domain model for consumption and incident records.

mod consumption;
mod error;
mod ids;
mod incident;

pub use consumption::{
    Consumption, MAX_QUANTITY, MAX_REASON_CHARS, PersistedConsumptionData, SupplyId,
};
pub use error::ActivityDomainError;
pub use ids::ActivityId;
pub use incident::{Incident, IncidentKind, PersistedIncidentData, Urgency};

/// Activity recorded against one task, each list oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskHistory {
    /// Material consumption records.
    pub consumos: Vec<Consumption>,
    /// Reported incidents.
    pub incidencias: Vec<Incident>,
}
