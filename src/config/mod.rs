mod database;
mod env_provider;
mod errors;
mod logging;
mod settings;

pub use database::Database;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::SettingsError;
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use settings::Settings;
