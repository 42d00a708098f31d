use crate::controllers::ViewMode;
use console_core::config::{configuration_directory, load_settings};
use console_core::error::ApiError;
use secrecy::Secret;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub list: ListSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApiSettings {
    /// Root of the document API (e.g., http://127.0.0.1:8000).
    pub base_url: String,
}

#[derive(Deserialize, Clone, Default)]
pub struct SessionSettings {
    /// Bearer token presented to the document API.
    pub access_token: Option<Secret<String>>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ListSettings {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default)]
    pub default_view_mode: ViewMode,
    /// Clear the selection after a batch operation the API reports as successful.
    #[serde(default = "default_true")]
    pub clear_selection_on_batch_success: bool,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            default_view_mode: ViewMode::default(),
            clear_selection_on_batch_success: true,
        }
    }
}

fn default_items_per_page() -> usize {
    20
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// OTLP collector (e.g., http://tempo:4317). Export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load settings from `document-console/config/base.yaml` and `APP_*` overrides.
pub fn get_configuration() -> Result<Settings, ApiError> {
    let directory = configuration_directory("document-console")?;
    load_settings(&directory)
}

/// Load settings from an explicit configuration directory.
pub fn get_configuration_from(directory: &Path) -> Result<Settings, ApiError> {
    load_settings(directory)
}
