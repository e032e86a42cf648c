//! Diesel schema for activity records.

diesel::table! {
    /// Supplies consumed while working on a task.
    consumptions (id) {
        /// Record identifier.
        id -> Uuid,
        /// Task the supply was used for.
        task_id -> Uuid,
        /// Consumed supply (`insumo_id`).
        supply_id -> Int8,
        /// Consumed units.
        quantity -> Int4,
        /// Reason label (`motivo`).
        #[max_length = 100]
        reason -> Varchar,
        /// Recording timestamp.
        recorded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Incidents reported against a task.
    incidents (id) {
        /// Record identifier.
        id -> Uuid,
        /// Affected task.
        task_id -> Uuid,
        /// Incident category label.
        #[max_length = 20]
        kind -> Varchar,
        /// Urgency label.
        #[max_length = 10]
        urgency -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Report timestamp.
        reported_at -> Timestamptz,
    }
}
