use poem_openapi::Object;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Whether the database file could be opened
    pub database: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}
