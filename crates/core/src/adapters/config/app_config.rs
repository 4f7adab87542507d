use config::{Config, Environment};
use error_stack::{report, ResultExt};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use super::{
    server_config::{ServerConfig, TelemetryConfig},
    sheets_config::{SheetsBackend, SpreadsheetConfig},
};

/// Environment variable naming the configuration file (extension optional).
pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "Config";
/// Overrides use `DRIVER_LOG_<SECTION>__<FIELD>`, e.g. `DRIVER_LOG_SHEETS__SPREADSHEET_ID`.
pub const ENV_PREFIX: &str = "DRIVER_LOG";

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub sheets: SpreadsheetConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Error reading config file '{0}'")]
    Read(String),
    #[error("Invalid config field '{0}'")]
    InvalidField(String),
    #[error("Missing config property '{0}'")]
    MissingProperty(&'static str),
}

impl AppConfig {
    pub fn load() -> error_stack::Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    #[instrument(name = "AppConfig::load_from")]
    pub fn load_from(config_path: &str) -> error_stack::Result<Self, ConfigError> {
        let value = Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|config| config.try_deserialize::<serde_json::Value>())
            .change_context_lazy(|| ConfigError::Read(config_path.to_string()))?;

        let app_config: AppConfig = serde_path_to_error::deserialize(value).map_err(|error| {
            let field = error.path().to_string();
            let reason = error.into_inner().to_string();
            report!(ConfigError::InvalidField(field)).attach_printable(reason)
        })?;

        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> error_stack::Result<(), ConfigError> {
        if self.sheets.backend == SheetsBackend::Google
            && self.sheets.spreadsheet_id.trim().is_empty()
        {
            return Err(report!(ConfigError::MissingProperty(
                "sheets.spreadsheet_id"
            )))
            .attach_printable("The google backend needs the id of the shared spreadsheet");
        }
        Ok(())
    }
}
