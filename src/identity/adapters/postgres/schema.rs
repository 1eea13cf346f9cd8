//! Diesel schema for user persistence.

diesel::table! {
    /// User accounts with role and active flag.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Normalized login email.
        #[max_length = 320]
        email -> Varchar,
        /// Argon2id digest in PHC format.
        password_hash -> Text,
        /// Role name.
        #[max_length = 16]
        role -> Varchar,
        /// Whether the user may log in and receive assignments.
        is_active -> Bool,
    }
}
