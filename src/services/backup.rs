use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::Database;
use crate::errors::InternalError;
use crate::errors::internal::BackupError;

/// Whole-file backup and restore of the SQLite database
pub struct BackupService {
    database: Database,
}

impl BackupService {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Download name for a backup taken now
    pub fn backup_file_name() -> String {
        format!("backup_{}.db", Local::now().format("%Y%m%d_%H%M%S"))
    }

    /// Current contents of the database file
    pub async fn backup(&self) -> Result<Vec<u8>, InternalError> {
        let bytes = tokio::fs::read(self.database.path())
            .await
            .map_err(|e| BackupError::io("read_database", e))?;

        tracing::info!("Database backup taken ({} bytes)", bytes.len());

        Ok(bytes)
    }

    /// Replace the database file with an uploaded backup
    ///
    /// The upload is written to a sibling temp file and migrated there, so an
    /// older backup gains any columns added since it was taken and a file
    /// SQLite cannot open is rejected before the live database is touched.
    pub async fn restore(&self, file_name: &str, bytes: &[u8]) -> Result<(), InternalError> {
        if !has_db_extension(file_name) {
            return Err(BackupError::InvalidFileType(file_name.to_string()).into());
        }

        let target = self.database.path();
        let staging = staging_path(target);

        tokio::fs::write(&staging, bytes)
            .await
            .map_err(|e| BackupError::io("write_staging_file", e))?;

        if let Err(e) = Database::sqlite_file(staging.clone()).migrate().await {
            tracing::warn!("Rejected backup {}: {}", file_name, e);
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(BackupError::NotADatabase(file_name.to_string()).into());
        }

        if let Err(e) = tokio::fs::rename(&staging, target).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(BackupError::io("replace_database", e).into());
        }

        tracing::warn!("Database replaced from uploaded backup {}", file_name);

        Ok(())
    }
}

fn has_db_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("db"))
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".restore-tmp");
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check() {
        assert!(has_db_extension("backup_20250101_120000.db"));
        assert!(has_db_extension("BACKUP.DB"));
        assert!(!has_db_extension("backup.db.txt"));
        assert!(!has_db_extension("backup"));
        assert!(!has_db_extension(""));
    }

    #[test]
    fn test_backup_file_name_shape() {
        let name = BackupService::backup_file_name();

        assert!(name.starts_with("backup_"));
        assert!(name.ends_with(".db"));
        // backup_ + YYYYMMDD_HHMMSS + .db
        assert_eq!(name.len(), "backup_".len() + 15 + ".db".len());
    }

    #[tokio::test]
    async fn test_restore_rejects_other_extensions_and_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::sqlite_file(dir.path().join("live.db"));
        database.migrate().await.unwrap();
        let service = BackupService::new(database.clone());

        let before = service.backup().await.unwrap();
        let result = service.restore("notes.txt", b"not a database").await;

        assert!(matches!(result, Err(InternalError::Backup(BackupError::InvalidFileType(_)))));
        assert_eq!(service.backup().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_restore_rejects_non_sqlite_content_and_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::sqlite_file(dir.path().join("live.db"));
        database.migrate().await.unwrap();
        let service = BackupService::new(database.clone());

        let before = service.backup().await.unwrap();
        let result = service.restore("garbage.db", &vec![0x42; 4096]).await;

        assert!(matches!(result, Err(InternalError::Backup(BackupError::NotADatabase(_)))));
        assert_eq!(service.backup().await.unwrap(), before);
        assert!(!staging_path(database.path()).exists());
    }

    #[tokio::test]
    async fn test_backup_then_restore_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::sqlite_file(dir.path().join("live.db"));
        database.migrate().await.unwrap();
        let service = BackupService::new(database.clone());

        let snapshot = service.backup().await.unwrap();
        assert!(snapshot.starts_with(b"SQLite format 3"));

        service.restore("snapshot.db", &snapshot).await.unwrap();

        assert!(!staging_path(database.path()).exists());
        assert_eq!(service.backup().await.unwrap().len(), snapshot.len());
    }
}
