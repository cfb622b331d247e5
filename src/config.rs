use crate::models::error::ConfigError;

pub const MONGODB_URL_VAR: &str = "MONGODB_URL";
pub const DATABASE_NAME: &str = "comicsdb";
pub const COLLECTION_NAME: &str = "comics";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_url: String,
}

impl AppConfig {
    /// Reads configuration from the process environment. Called once at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mongodb_url = lookup(MONGODB_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(MONGODB_URL_VAR))?;

        Ok(AppConfig { mongodb_url })
    }
}
