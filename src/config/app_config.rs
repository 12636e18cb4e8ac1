use core::fmt;
use std::{env, time::Duration};

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::service::session_controller::SessionSettings;

pub static CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().unwrap_or_else(|e| panic!("{}", e)));

#[derive(Serialize, Deserialize, Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runtime::Dev => write!(f, "development"),
            Runtime::Prod => write!(f, "production"),
        }
    }
}

impl From<String> for Runtime {
    fn from(value: String) -> Self {
        match value.as_str() {
            "DEVELOPMENT" => Runtime::Dev,
            "PRODUCTION" => Runtime::Prod,
            _ => Runtime::Prod,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub api: ApiConfig,
    #[serde(default)]
    #[validate(nested)]
    pub session: SessionConfig,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_question_time() -> u32 {
    30
}

fn default_tick_millis() -> u64 {
    1000
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    #[validate(url(message = "api.base_url must be a valid url"))]
    pub base_url: String,
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 300, message = "api.timeout_secs must be within 1-300"))]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SessionConfig {
    #[serde(default = "default_question_time")]
    #[validate(range(min = 1, max = 3600, message = "session.question_time must be within 1-3600"))]
    pub question_time: u32,
    #[serde(default = "default_tick_millis")]
    #[validate(range(min = 10, message = "session.tick_millis must be at least 10"))]
    pub tick_millis: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            question_time: default_question_time(),
            tick_millis: default_tick_millis(),
        }
    }
}

impl SessionConfig {
    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            question_time: self.question_time,
            tick_period: Duration::from_millis(self.tick_millis),
        }
    }
}

impl AppConfig {
    fn load() -> Result<Self, ConfigError> {
        let runtime: Runtime = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "DEVELOPMENT".into())
            .into();

        let config: AppConfig = Config::builder()
            .add_source(File::with_name(&format!("src/config/{}.toml", runtime)).required(false))
            .add_source(Environment::with_prefix("QUIZ").separator("__"))
            .build()?
            .try_deserialize()?;

        config
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        debug!(
            "Loaded {} config: api {}, {}s per question",
            runtime, config.api.base_url, config.session.question_time
        );

        Ok(config)
    }
}
