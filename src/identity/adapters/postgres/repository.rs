//! `PostgreSQL` repository implementation for user storage.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::identity::{
    domain::{
        DisplayName, EmailAddress, PasswordDigest, PersistedUserData, Role, User, UserId,
    },
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::storage::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let email = user.email().clone();
        let new_row = to_new_row(user);

        self.run_blocking(move |connection| {
            // Pre-check for a semantic error; the unique index still guards
            // the window between check and insert.
            let taken: i64 = users::table
                .filter(users::email.eq(email.as_str()))
                .count()
                .get_result(connection)
                .map_err(UserRepositoryError::persistence)?;
            if taken > 0 {
                return Err(UserRepositoryError::DuplicateEmail(email));
            }

            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_unique_violation(err, user_id, &email))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let email = user.email().clone();
        let row = to_new_row(user);

        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.find(row.id))
                .set((
                    users::name.eq(&row.name),
                    users::email.eq(&row.email),
                    users::password_hash.eq(&row.password_hash),
                    users::role.eq(&row.role),
                    users::is_active.eq(row.is_active),
                ))
                .execute(connection)
                .map_err(|err| map_unique_violation(err, user_id, &email))?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?
                .map(row_to_user)
                .transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let lookup = email.clone();
        self.run_blocking(move |connection| {
            users::table
                .filter(users::email.eq(lookup.as_str()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?
                .map(row_to_user)
                .transpose()
        })
        .await
    }

    async fn list_active_by_role(&self, role: Role) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::role.eq(role.as_str()))
                .filter(users::is_active.eq(true))
                .order(users::name.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

fn to_new_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().into_inner(),
        name: user.name().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        password_hash: user.password().as_str().to_owned(),
        role: user.role().as_str().to_owned(),
        is_active: user.is_active(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        name,
        email,
        password_hash,
        role,
        is_active,
    } = row;

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        name: DisplayName::new(name).map_err(UserRepositoryError::persistence)?,
        email: EmailAddress::new(email).map_err(UserRepositoryError::persistence)?,
        password: PasswordDigest::from_encoded(password_hash),
        role: Role::try_from(role.as_str()).map_err(UserRepositoryError::persistence)?,
        is_active,
    };
    Ok(User::from_persisted(data))
}

fn is_email_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_users_email_unique")
}

fn map_unique_violation(
    err: DieselError,
    user_id: UserId,
    email: &EmailAddress,
) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_email_unique_violation(info.as_ref()) =>
        {
            UserRepositoryError::DuplicateEmail(email.clone())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserRepositoryError::DuplicateUser(user_id)
        }
        _ => UserRepositoryError::persistence(err),
    }
}
