use std::sync::Arc;

use crate::config::{Database, Settings};
use crate::errors::InternalError;
use crate::services::{BackupService, BulkImporter};
use crate::stores::{CredentialStore, NewUser, ReportStore};
use crate::types::internal::Role;

/// Username of the account seeded into an empty database
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

/// Application-wide dependencies, created once in main.rs and shared by handlers
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(settings)
///   ├─ database (Database, opened per request)
///   ├─ credential_store (Arc<CredentialStore>)
///   ├─ report_store (Arc<ReportStore>)
///   ├─ bulk_importer (Arc<BulkImporter>) → report_store
///   └─ backup_service (Arc<BackupService>) → database
///   ↓ wrapped in Arc<AppData>
///   ↓ attached to the route tree with `.data(..)`
/// ```
pub struct AppData {
    pub settings: Settings,
    pub database: Database,
    pub credential_store: Arc<CredentialStore>,
    pub report_store: Arc<ReportStore>,
    pub bulk_importer: Arc<BulkImporter>,
    pub backup_service: Arc<BackupService>,
}

impl AppData {
    /// Build all stores and services
    ///
    /// Does not touch the database; call `migrate()` before serving.
    pub fn init(settings: Settings) -> Self {
        tracing::info!("Initializing AppData...");

        let database = Database::sqlite_file(settings.database_path().clone());
        let credential_store = Arc::new(CredentialStore::new(settings.password_pepper().to_string()));
        let report_store = Arc::new(ReportStore::new());
        let bulk_importer = Arc::new(BulkImporter::new(report_store.clone()));
        let backup_service = Arc::new(BackupService::new(database.clone()));

        tracing::info!("AppData initialization complete");

        Self {
            settings,
            database,
            credential_store,
            report_store,
            bulk_importer,
            backup_service,
        }
    }

    pub async fn migrate(&self) -> Result<(), InternalError> {
        self.database.migrate().await
    }

    /// Create the first admin account when the users table is empty
    ///
    /// # Returns
    /// * `Ok(true)` - An admin was created from `BOOTSTRAP_ADMIN_PASSWORD`
    /// * `Ok(false)` - Users already exist, or no bootstrap password is configured
    pub async fn seed_admin(&self) -> Result<bool, InternalError> {
        let conn = self.database.open().await?;

        if self.credential_store.count_users(&conn).await? > 0 {
            return Ok(false);
        }

        let Some(password) = self.settings.bootstrap_admin_password() else {
            tracing::warn!(
                "No user accounts exist; set BOOTSTRAP_ADMIN_PASSWORD or run `create-user` to add an admin"
            );
            return Ok(false);
        };

        self.credential_store
            .create_user(
                &conn,
                NewUser {
                    username: BOOTSTRAP_ADMIN_USERNAME.to_string(),
                    password: password.to_string(),
                    display_name: "مدیر سامانه".to_string(),
                    role: Role::Admin,
                },
            )
            .await?;

        tracing::info!("Seeded bootstrap admin account '{}'", BOOTSTRAP_ADMIN_USERNAME);

        Ok(true)
    }
}
