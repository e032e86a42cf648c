//! Diesel schema for the order records read by the board.

diesel::table! {
    /// Customer orders owned by the order-entry side of the shop.
    orders (id) {
        /// Order identifier (`pedido_id`).
        id -> Int8,
        /// Client display name.
        #[max_length = 255]
        client_name -> Varchar,
        /// Shop area the order is routed to.
        #[max_length = 100]
        area -> Varchar,
        /// Priority label.
        #[max_length = 50]
        priority -> Varchar,
        /// Committed delivery date.
        commitment_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
