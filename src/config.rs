use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub call_service: CallServiceConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

#[derive(Debug, Deserialize)]
pub struct CallServiceConfig {
    /// Public key identifying this client to the Call Service
    pub public_key: String,

    /// Assistant configuration used for every session
    pub assistant_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Record store endpoint URL
    pub url: String,

    /// Record store access key
    pub api_key: String,

    /// Table holding one row per completed call
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "interviews".to_string()
}

#[derive(Debug, Deserialize)]
pub struct WebhookConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

impl Config {
    /// Load configuration from a file, with COACH-prefixed environment
    /// variables layered on top. Missing store or Call Service credentials
    /// fail deserialization and abort startup.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("COACH").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
