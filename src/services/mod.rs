// Services layer - Policy decisions and multi-step workflows over the stores
pub mod access_policy;
pub mod backup;
pub mod bulk_import;

pub use access_policy::{Permission, authorize};
pub use backup::BackupService;
pub use bulk_import::BulkImporter;
