// Database entities - SeaORM models
pub mod report;
pub mod user;
