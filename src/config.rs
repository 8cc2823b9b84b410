use crate::session::SessionConfig;
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `SPAM_CONSOLE__SERVICE__BASE_URL`
const ENV_PREFIX: &str = "SPAM_CONSOLE";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub session: SessionSettings,
    pub mock: MockConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    pub history_limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct MockConfig {
    pub bind: String,
    pub port: u16,
}

impl Config {
    /// Load `path` (any extension the config crate knows, optional) over the
    /// built-in defaults, then apply environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "spam-console")?
            .set_default("service.base_url", "http://localhost:8000")?
            .set_default("session.history_limit", 10)?
            .set_default("mock.bind", "127.0.0.1")?
            .set_default("mock.port", 8000)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session settings for a new coordinator
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            base_url: self.service.base_url.clone(),
            history_limit: self.session.history_limit,
            request_timeout: self.service.request_timeout_secs.map(Duration::from_secs),
            ..SessionConfig::default()
        }
    }

    /// Address the mock service binds to
    pub fn mock_addr(&self) -> String {
        format!("{}:{}", self.mock.bind, self.mock.port)
    }
}
