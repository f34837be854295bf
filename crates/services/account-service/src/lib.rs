//! Account Service Library
//!
//! This crate provides account provisioning on top of a SeaORM record store.
//! It backs the `account-service` administrative CLI.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::AccountServiceConfig;
use crate::infra::Database;
use crate::repository::AccountStore;
use crate::service::AccountProvisioner;

/// Connect to the database, apply pending migrations and build a provisioner.
pub async fn connect_provisioner(
    config: &AccountServiceConfig,
) -> Result<AccountProvisioner, Box<dyn std::error::Error>> {
    let hasher = Arc::new(config.hasher.build()?);
    let db = Database::connect(&config.database).await?;

    let account_repo = Arc::new(AccountStore::new(db.get_connection()));
    Ok(AccountProvisioner::new(account_repo, hasher))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &AccountServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
