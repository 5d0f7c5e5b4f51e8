// Common test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use payment_reports::api::SESSION_COOKIE_NAME;
use payment_reports::app_data::AppData;
use payment_reports::config::Settings;
use payment_reports::stores::NewUser;
use payment_reports::types::internal::{ReportFields, Role};
use poem::http::header;
use poem::test::TestResponse;
use sea_orm::{Database, DatabaseConnection};

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Settings pointing at a database file inside `dir`
pub fn test_settings(dir: &Path) -> Settings {
    let vars = HashMap::from([
        ("DATABASE_PATH".to_string(), dir.join("reports.db").display().to_string()),
        ("SECRET_KEY".to_string(), "integration-test-secret".to_string()),
    ]);

    Settings::from_env_provider(&vars).expect("Failed to build test settings")
}

/// File-backed application with a migrated database
pub async fn setup_test_app(dir: &Path) -> Arc<AppData> {
    let app = AppData::init(test_settings(dir));
    app.migrate().await.expect("Failed to migrate test database");
    Arc::new(app)
}

/// Adds an account whose password equals its username
pub async fn add_user(app: &AppData, username: &str, display_name: &str, role: Role) -> String {
    let conn = app.database.open().await.expect("Failed to open database");
    app.credential_store
        .create_user(
            &conn,
            NewUser {
                username: username.to_string(),
                password: username.to_string(),
                display_name: display_name.to_string(),
                role,
            },
        )
        .await
        .expect("Failed to create user")
}

pub fn fields(province: &str, unit: &str, month: &str, year: &str) -> ReportFields {
    ReportFields {
        province: province.to_string(),
        unit_name: unit.to_string(),
        month: month.to_string(),
        year: year.to_string(),
        ..Default::default()
    }
}

/// `name=value` of the session cookie set by a response, if any
pub fn session_cookie(resp: &TestResponse) -> Option<String> {
    resp.0
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(SESSION_COOKIE_NAME))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub fn location(resp: &TestResponse) -> Option<String> {
    resp.0
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub async fn body_text(resp: TestResponse) -> String {
    resp.0
        .into_body()
        .into_string()
        .await
        .expect("Failed to read response body")
}

pub async fn body_bytes(resp: TestResponse) -> Vec<u8> {
    resp.0
        .into_body()
        .into_vec()
        .await
        .expect("Failed to read response body")
}

/// Single-sheet xlsx with every cell written as text
pub fn xlsx(rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet
                    .write_string(r as u32, c as u16, *value)
                    .expect("Failed to write cell");
            }
        }
    }
    workbook.save_to_buffer().expect("Failed to build workbook")
}
