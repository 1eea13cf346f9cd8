//! Shared fixtures for unit tests.

use crate::identity::{
    adapters::memory::InMemoryUserRepository,
    domain::{Caller, DisplayName, EmailAddress, PasswordDigest, Role, User},
    ports::UserRepository,
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Mutex, PoisonError};

/// Clock frozen at a chosen instant until advanced.
#[derive(Debug)]
pub(crate) struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub(crate) const fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now()
    }
}

/// Noon UTC on a fixed weekday, away from any DST boundary.
pub(crate) fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 11, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Stores a user with a placeholder digest and returns it.
pub(crate) async fn seed_user(
    users: &InMemoryUserRepository,
    name: &str,
    email: &str,
    role: Role,
    active: bool,
) -> User {
    let mut user = User::new(
        DisplayName::new(name).expect("valid name"),
        EmailAddress::new(email).expect("valid email"),
        PasswordDigest::from_encoded("$argon2id$placeholder".to_owned()),
        role,
    );
    user.set_active(active);
    users.store(&user).await.expect("user should store");
    user
}

/// Caller context for `user`, as the access guard would produce it.
pub(crate) const fn caller_for(user: &User) -> Caller {
    Caller::new(user.id(), user.role())
}
