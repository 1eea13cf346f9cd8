//! Diesel row models for user persistence.

use super::schema::users;
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Normalized login email.
    pub email: String,
    /// Password digest.
    pub password_hash: String,
    /// Role name.
    pub role: String,
    /// Active flag.
    pub is_active: bool,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Normalized login email.
    pub email: String,
    /// Password digest.
    pub password_hash: String,
    /// Role name.
    pub role: String,
    /// Active flag.
    pub is_active: bool,
}
