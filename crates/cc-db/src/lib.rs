//! Persistence for CloudCoder: row models, repositories over any
//! `sqlx::Executor`, and transactional units of work.

pub mod models;
pub mod repositories;
pub mod unit_of_work;

use std::time::Duration;

use anyhow::Context;
use sqlx::{
    PgPool, Postgres,
    migrate::{MigrateDatabase, Migrator},
    postgres::PgPoolOptions,
};

/// Schema migrations embedded from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("failed to connect to database")
}

/// Create the database when it does not exist yet, connect, and apply any
/// pending migrations.
pub async fn ensure_db_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<PgPool> {
    if !Postgres::database_exists(database_url)
        .await
        .context("failed to check for database")?
    {
        tracing::info!("database missing, creating it");
        Postgres::create_database(database_url)
            .await
            .context("failed to create database")?;
    }

    let pool = create_pool(database_url, max_connections).await?;
    MIGRATOR
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    Ok(pool)
}
