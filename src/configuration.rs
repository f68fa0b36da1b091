use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Holds the webhook url when set; an empty value counts as unset.
pub const WEBHOOK_URL_ENV: &str = "GOOGLE_SHEETS_WEBHOOK_URL";

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub webhook: WebhookSettings,
    pub page: PageSettings,
    pub local_fallback: LocalFallbackSettings,
}

#[derive(Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize)]
pub struct WebhookSettings {
    pub url: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_millis: u64,
}

impl WebhookSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    pub fn configured_url(&self) -> Option<&Secret<String>> {
        self.url
            .as_ref()
            .filter(|url| !url.expose_secret().trim().is_empty())
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct PageSettings {
    pub brand: String,
    pub headline: String,
    pub tagline: String,
    pub launch_status: String,
    pub footer: String,
}

#[derive(Deserialize)]
pub struct LocalFallbackSettings {
    pub enabled: bool,
    pub path: Option<String>,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?
        .join("configuration");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let webhook_url = std::env::var(WEBHOOK_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty());

    config::Config::builder()
        .add_source(config::File::from(base_path.join("base")).required(true))
        .add_source(config::File::from(base_path.join(environment.as_str())).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("webhook.url", webhook_url)?
        .build()?
        .try_deserialize()
}
