use std::collections::HashMap;

/// Source of environment variables
///
/// Settings are read through this trait so tests can supply their own values
/// instead of mutating the process environment shared by parallel tests.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables, for tests and embedding
impl EnvironmentProvider for HashMap<String, String> {
    fn get_var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn empty() -> Self {
        Self { vars: HashMap::new() }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_environment_reads_missing_as_none() {
        assert_eq!(SystemEnvironment.get_var("PAYMENT_REPORTS_UNSET_VAR_98765"), None);
    }

    #[test]
    fn test_mock_environment_provider() {
        let provider = MockEnvironment::empty()
            .with_var("PORT", "8080")
            .with_vars(&[("HOST", "127.0.0.1"), ("PORT", "9090")]);

        assert_eq!(provider.get_var("HOST"), Some("127.0.0.1".to_string()));
        assert_eq!(provider.get_var("PORT"), Some("9090".to_string()));
        assert_eq!(provider.get_var("SECRET_KEY"), None);
    }

    #[test]
    fn test_hash_map_provider() {
        let vars = HashMap::from([("DATABASE_PATH".to_string(), "reports.db".to_string())]);

        assert_eq!(vars.get_var("DATABASE_PATH"), Some("reports.db".to_string()));
        assert_eq!(vars.get_var("HOST"), None);
    }
}
