use std::sync::Arc;

use chrono::Utc;
use poem::web::Data;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::app_data::AppData;
use crate::types::dto::HealthResponse;

/// Health check API
pub struct HealthApi;

/// API tags for health endpoints
#[derive(Tags)]
enum ApiTags {
    /// Health check endpoints
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Health check endpoint
    ///
    /// Reports whether the database file can be opened
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self, app: Data<&Arc<AppData>>) -> Json<HealthResponse> {
        let database = match app.database.open().await {
            Ok(_) => "ok",
            Err(e) => {
                tracing::warn!("Health check could not open the database: {}", e);
                "unavailable"
            }
        };

        Json(HealthResponse {
            status: "healthy".to_string(),
            database: database.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
