//! Incident reports raised from the shop floor.

use super::{ActivityDomainError, ActivityId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a reported incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentKind {
    /// Material is missing.
    #[serde(rename = "faltante")]
    Shortage,
    /// Material or a part is defective.
    #[serde(rename = "defecto")]
    Defect,
    /// A machine or tool is out of order.
    #[serde(rename = "equipo")]
    Equipment,
}

impl IncidentKind {
    /// Returns the canonical storage and wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shortage => "faltante",
            Self::Defect => "defecto",
            Self::Equipment => "equipo",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IncidentKind {
    type Error = ActivityDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "faltante" => Ok(Self::Shortage),
            "defecto" => Ok(Self::Defect),
            "equipo" => Ok(Self::Equipment),
            _ => Err(ActivityDomainError::UnknownIncidentKind(value.to_owned())),
        }
    }
}

/// How urgently an incident needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Urgency {
    /// Can wait.
    #[serde(rename = "baja")]
    Low,
    /// Needs attention during the shift.
    #[serde(rename = "media")]
    Medium,
    /// Blocks work.
    #[serde(rename = "alta")]
    High,
}

impl Urgency {
    /// Returns the canonical storage and wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "baja",
            Self::Medium => "media",
            Self::High => "alta",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Urgency {
    type Error = ActivityDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "baja" => Ok(Self::Low),
            "media" => Ok(Self::Medium),
            "alta" => Ok(Self::High),
            _ => Err(ActivityDomainError::UnknownUrgency(value.to_owned())),
        }
    }
}

/// Incident reported against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    id: ActivityId,
    task_id: TaskId,
    kind: IncidentKind,
    urgency: Urgency,
    description: String,
    reported_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a stored incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIncidentData {
    /// Record identifier.
    pub id: ActivityId,
    /// Affected task.
    pub task_id: TaskId,
    /// Incident category.
    pub kind: IncidentKind,
    /// Urgency.
    pub urgency: Urgency,
    /// Free-text description.
    pub description: String,
    /// When the incident was reported.
    pub reported_at: DateTime<Utc>,
}

impl Incident {
    /// Creates an incident stamped with the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityDomainError::EmptyDescription`] for a blank
    /// description.
    pub fn new(
        task_id: TaskId,
        kind: IncidentKind,
        urgency: Urgency,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ActivityDomainError> {
        let raw_description = description.into();
        let trimmed = raw_description.trim();
        if trimmed.is_empty() {
            return Err(ActivityDomainError::EmptyDescription);
        }
        Ok(Self {
            id: ActivityId::new(),
            task_id,
            kind,
            urgency,
            description: trimmed.to_owned(),
            reported_at: clock.utc(),
        })
    }

    /// Reconstructs an incident from storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIncidentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            kind: data.kind,
            urgency: data.urgency,
            description: data.description,
            reported_at: data.reported_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the affected task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the incident category.
    #[must_use]
    pub const fn kind(&self) -> IncidentKind {
        self.kind
    }

    /// Returns the urgency.
    #[must_use]
    pub const fn urgency(&self) -> Urgency {
        self.urgency
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns when the incident was reported.
    #[must_use]
    pub const fn reported_at(&self) -> DateTime<Utc> {
        self.reported_at
    }
}
