use std::fmt;
use std::path::PathBuf;

use crate::config::errors::SettingsError;
use crate::config::{EnvironmentProvider, SystemEnvironment};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_PATH: &str = "database.db";

/// Process settings read once at startup
pub struct Settings {
    server_host: String,
    server_port: u16,
    database_path: PathBuf,
    secret_key: Option<String>,
    password_pepper: String,
    bootstrap_admin_password: Option<String>,
    session_cookie_secure: bool,
}

impl Settings {
    /// Load settings through an environment provider
    ///
    /// Unset and empty variables fall back to their defaults.
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SettingsError> {
        let server_host = non_empty(env, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let server_port = match non_empty(env, "PORT") {
            Some(value) => parse_port(&value)?,
            None => DEFAULT_PORT,
        };

        let database_path = non_empty(env, "DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let session_cookie_secure = match non_empty(env, "SESSION_COOKIE_SECURE") {
            Some(value) => parse_bool(&value, "SESSION_COOKIE_SECURE")?,
            None => false,
        };

        Ok(Self {
            server_host,
            server_port,
            database_path,
            secret_key: non_empty(env, "SECRET_KEY"),
            password_pepper: env.get_var("PASSWORD_PEPPER").unwrap_or_default(),
            bootstrap_admin_password: non_empty(env, "BOOTSTRAP_ADMIN_PASSWORD"),
            session_cookie_secure,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn database_path(&self) -> &PathBuf {
        &self.database_path
    }

    /// Secret the session cookie signing key is derived from
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn bootstrap_admin_password(&self) -> Option<&str> {
        self.bootstrap_admin_password.as_deref()
    }

    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }

    /// Override the database location; used by the CLI and tests
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }
}

fn non_empty(env: &dyn EnvironmentProvider, key: &str) -> Option<String> {
    env.get_var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_port(value: &str) -> Result<u16, SettingsError> {
    let port: u16 = value.parse().map_err(|e: std::num::ParseIntError| SettingsError::ParseError {
        setting_name: "PORT".to_string(),
        error: e.to_string(),
    })?;

    if port == 0 {
        return Err(SettingsError::InvalidSetting {
            setting_name: "PORT".to_string(),
            reason: "must be between 1 and 65535".to_string(),
        });
    }

    Ok(port)
}

fn parse_bool(value: &str, setting_name: &str) -> Result<bool, SettingsError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(SettingsError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("expected a boolean, got '{}'", value),
        }),
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("database_path", &self.database_path)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("password_pepper", &"[REDACTED]")
            .field("bootstrap_admin_password", &self.bootstrap_admin_password.as_ref().map(|_| "[REDACTED]"))
            .field("session_cookie_secure", &self.session_cookie_secure)
            .finish()
    }
}
