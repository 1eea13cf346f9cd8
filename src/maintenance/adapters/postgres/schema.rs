//! Diesel schema for request and task persistence.

diesel::table! {
    /// Maintenance requests opened by administrators.
    requests (id) {
        /// Request identifier.
        id -> Uuid,
        /// Short title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Where the work is needed.
        #[max_length = 255]
        location -> Nullable<Varchar>,
        /// Area or department.
        #[max_length = 255]
        area -> Nullable<Varchar>,
        /// Priority name.
        #[max_length = 16]
        priority -> Varchar,
        /// Status name, derived from the request's tasks.
        #[max_length = 16]
        status -> Varchar,
        /// Administrator who opened the request.
        created_by -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Completion timestamp, set while the status is `DONE`.
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Units of work under a request.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Parent request.
        request_id -> Uuid,
        /// Short title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-text description.
        description -> Nullable<Text>,
        /// Status name.
        #[max_length = 16]
        status -> Varchar,
        /// Assigned technician.
        assigned_to -> Nullable<Uuid>,
        /// Due date.
        due_date -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Completion timestamp, set while the status is `DONE`.
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(tasks -> requests (request_id));
diesel::allow_tables_to_appear_in_same_query!(requests, tasks);
