use std::path::{Path, PathBuf};

use migration::{Migrator, MigratorTrait};
use sea_orm::sqlx::sqlite::SqliteJournalMode;
use sea_orm::{ConnectOptions, DatabaseConnection};

use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;

/// Location of the SQLite file and the way to reach it
///
/// Connections are not pooled across requests: every request opens its own
/// connection and drops it before the response is sent, so a restored
/// database file is picked up by the very next request.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn sqlite_file(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connection URL; `mode=rwc` creates the file on first use
    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.display())
    }

    /// Open a single-connection handle for one unit of work
    pub async fn open(&self) -> Result<DatabaseConnection, InternalError> {
        let url = self.url();

        // Rollback journal keeps every committed write in the main file, which
        // backup and restore copy as a whole
        let mut options = ConnectOptions::new(url.clone());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false)
            .map_sqlx_sqlite_opts(|opts| opts.journal_mode(SqliteJournalMode::Delete));

        let conn = sea_orm::Database::connect(options)
            .await
            .map_err(|source| DatabaseError::Connect { url, source })?;

        Ok(conn)
    }

    /// Create or upgrade the schema
    ///
    /// Runs all pending migrations; a no-op on an up-to-date file.
    ///
    /// # Returns
    /// * `Ok(())` - Migrations completed successfully
    /// * `Err(InternalError)` - Connection or migration failed
    pub async fn migrate(&self) -> Result<(), InternalError> {
        let conn = self.open().await?;

        Migrator::up(&conn, None)
            .await
            .map_err(|source| DatabaseError::Migration { source })?;

        tracing::debug!("Database migrations completed for {}", self.path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ConnectionTrait;

    #[tokio::test]
    async fn test_migrate_creates_file_and_tables() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::sqlite_file(dir.path().join("reports.db"));

        database.migrate().await.unwrap();
        assert!(database.path().exists());

        // Second run is a no-op
        database.migrate().await.unwrap();

        let conn = database.open().await.unwrap();
        conn.execute_unprepared("SELECT id, arrears_payment, submitted_by FROM reports")
            .await
            .unwrap();
        conn.execute_unprepared("SELECT id, username, role FROM users")
            .await
            .unwrap();
    }

    #[test]
    fn test_url_requests_create_mode() {
        let database = Database::sqlite_file("data/app.db");
        assert_eq!(database.url(), "sqlite://data/app.db?mode=rwc");
    }
}
