use std::str::FromStr;
use std::time::Duration;

use sea_orm::{DatabaseConnection, DbErr, SqlxSqliteConnector};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::info;

use crate::config::DatabaseConfig;

/// Handle to the persistent store.
///
/// SQLite accepts one writer at a time, so every mutation goes through
/// `writer`, a pool capped at a single connection. Reads use `reader` and run
/// concurrently against WAL snapshots, seeing only committed data.
#[derive(Clone)]
pub struct Store {
    writer: DatabaseConnection,
    reader: DatabaseConnection,
}

impl Store {
    /// Open both pools and sync the schema from the entities.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let options = connect_options(config)?;

        let writer_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(Duration::from_millis(config.write_timeout_ms))
            .connect_with(options.clone())
            .await
            .map_err(sqlx_err)?;
        let writer = SqlxSqliteConnector::from_sqlx_sqlite_pool(writer_pool);

        // Schema must exist before readers connect, since the file may be new.
        writer
            .get_schema_registry("quote_server::entity::*")
            .sync(&writer)
            .await?;

        let reader_pool = SqlitePoolOptions::new()
            .max_connections(config.reader_max_connections.max(1))
            .connect_with(options.create_if_missing(false))
            .await
            .map_err(sqlx_err)?;
        let reader = SqlxSqliteConnector::from_sqlx_sqlite_pool(reader_pool);

        info!(
            url = %config.url,
            readers = config.reader_max_connections,
            "Store opened"
        );

        Ok(Self { writer, reader })
    }

    /// Connection for write transactions. At most one is ever checked out.
    pub fn writer(&self) -> &DatabaseConnection {
        &self.writer
    }

    /// Connection pool for read-only queries.
    pub fn reader(&self) -> &DatabaseConnection {
        &self.reader
    }

    /// Close both pools. Called once the server has stopped accepting requests.
    pub async fn close(self) -> Result<(), DbErr> {
        self.reader.close().await?;
        self.writer.close().await?;
        info!("Store closed");
        Ok(())
    }
}

fn connect_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions, DbErr> {
    let url = if config.url.starts_with("sqlite:") {
        config.url.clone()
    } else {
        format!("sqlite://{}", config.url)
    };

    let options = SqliteConnectOptions::from_str(&url)
        .map_err(sqlx_err)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    Ok(options)
}

fn sqlx_err(err: sqlx::Error) -> DbErr {
    DbErr::Conn(sea_orm::RuntimeErr::SqlxError(err.into()))
}
