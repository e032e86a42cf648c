//! Validation errors for activity records.

use thiserror::Error;

/// Errors returned while constructing activity records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActivityDomainError {
    /// Supply identifiers are positive.
    #[error("supply id must be positive, got {0}")]
    InvalidSupplyId(i64),

    /// Consumed quantity is zero.
    #[error("consumed quantity must be positive")]
    ZeroQuantity,

    /// Consumed quantity exceeds what a single record may hold.
    #[error("consumed quantity {0} is too large")]
    QuantityTooLarge(u32),

    /// Consumption reason is blank.
    #[error("consumption reason must not be empty")]
    EmptyReason,

    /// Consumption reason is longer than storage allows.
    #[error("consumption reason must be at most {max} characters")]
    ReasonTooLong {
        /// Maximum length in characters.
        max: usize,
    },

    /// Incident description is blank.
    #[error("incident description must not be empty")]
    EmptyDescription,

    /// Incident kind label is not recognised.
    #[error("unknown incident kind: {0}")]
    UnknownIncidentKind(String),

    /// Urgency label is not recognised.
    #[error("unknown urgency: {0}")]
    UnknownUrgency(String),
}
