//! Application service for recording shop-floor activity.

mod recorder;

pub use recorder::{
    ActivityError, ActivityResult, ActivityService, RecordConsumptionRequest,
    ReportIncidentRequest,
};
