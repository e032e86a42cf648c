//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Board tasks with their time ledger.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning order (`pedido_id`).
        order_id -> Int8,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Shop area.
        #[max_length = 100]
        area -> Varchar,
        /// Priority label.
        #[max_length = 50]
        priority -> Varchar,
        /// Assigned operator.
        #[max_length = 255]
        assignee -> Varchar,
        /// Board state label.
        #[max_length = 20]
        state -> Varchar,
        /// Start of the open running interval.
        started_at -> Nullable<Timestamptz>,
        /// Sum of closed running intervals in seconds.
        accumulated_seconds -> Int8,
        /// Optimistic concurrency revision.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last lifecycle timestamp.
        updated_at -> Timestamptz,
    }
}
