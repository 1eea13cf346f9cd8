//! Provisions the initial administrator and technician accounts.
//!
//! Usage:
//!
//! ```text
//! fixdesk_seed
//! ```
//!
//! Settings come from `fixdesk.yaml` and `FIXDESK_*` environment variables
//! (see [`fixdesk::config`]). The binary applies the schema, then creates the
//! configured administrator plus `tech1@<domain>` through
//! `tech<N>@<domain>`, all sharing the seed password. Accounts whose email is
//! already registered are left untouched, so reruns are safe.

use std::sync::Arc;

use fixdesk::config::{AppConfig, SeedConfig};
use fixdesk::identity::{
    adapters::{credentials::Argon2PasswordHasher, postgres::PostgresUserRepository},
    domain::Role,
    ports::{CredentialError, UserRepositoryError},
    services::{DirectoryError, ProvisionUserRequest, UserDirectoryService},
};
use fixdesk::storage::{Store, StoreError};
use thiserror::Error;
use tokio::runtime::Builder;

type Directory = UserDirectoryService<PostgresUserRepository, Argon2PasswordHasher>;

/// Errors that abort seeding.
#[derive(Debug, Error)]
enum SeedError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] tracing_subscriber::util::TryInitError),
    #[error("runtime init failed: {0}")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid password parameters: {0}")]
    Hasher(#[from] CredentialError),
    #[error("failed to provision {email}: {source}")]
    Provision {
        email: String,
        #[source]
        source: DirectoryError,
    },
}

/// Outcome of provisioning one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provisioned {
    Created,
    AlreadyPresent,
}

fn main() -> Result<(), SeedError> {
    let config = AppConfig::load()?;
    fixdesk::telemetry::init(&config.telemetry)?;
    if config.session.uses_development_secret() {
        tracing::warn!("session secret is the development default; set FIXDESK_SESSION__SECRET");
    }

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(SeedError::Runtime)?;
    runtime.block_on(seed(&config))
}

async fn seed(config: &AppConfig) -> Result<(), SeedError> {
    let store = Store::open(&config.database)?;
    store.apply_schema().await?;

    let directory = UserDirectoryService::new(
        Arc::new(store.users()),
        Arc::new(Argon2PasswordHasher::from_config(&config.password)?),
    );
    let mut created = 0_u32;
    for (name, email, role) in accounts(&config.seed) {
        let outcome = provision(&directory, &config.seed, &name, &email, role).await?;
        if outcome == Provisioned::Created {
            created += 1;
        }
    }

    tracing::info!(created, technicians = config.seed.tech_count, "seeding finished");
    store.close();
    Ok(())
}

fn accounts(seed: &SeedConfig) -> Vec<(String, String, Role)> {
    let admin = (seed.admin_name.clone(), seed.admin_email.clone(), Role::Admin);
    let techs = (1..=seed.tech_count).map(|n| {
        (
            format!("Technician {n}"),
            format!("tech{n}@{}", seed.email_domain),
            Role::Tech,
        )
    });
    std::iter::once(admin).chain(techs).collect()
}

async fn provision(
    directory: &Directory,
    seed: &SeedConfig,
    name: &str,
    email: &str,
    role: Role,
) -> Result<Provisioned, SeedError> {
    let request = ProvisionUserRequest::new(name, email, seed.password.as_str(), role);
    match directory.provision(request).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id(), email, role = %role, "seeded account");
            Ok(Provisioned::Created)
        }
        Err(DirectoryError::Repository(UserRepositoryError::DuplicateEmail(_))) => {
            tracing::info!(email, "account already present");
            Ok(Provisioned::AlreadyPresent)
        }
        Err(source) => Err(SeedError::Provision {
            email: email.to_owned(),
            source,
        }),
    }
}
