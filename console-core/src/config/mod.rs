use crate::error::ApiError;
use config::{Config as Cfg, Environment, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Environment prefix shared by every console binary (`APP_API__BASE_URL`).
pub const ENV_PREFIX: &str = "APP";

/// Load layered settings: `<dir>/base.yaml` (required), then `APP_*` env vars.
///
/// A `.env` file in the working directory is read first when present.
pub fn load_settings<T: DeserializeOwned>(configuration_directory: &Path) -> Result<T, ApiError> {
    dotenvy::dotenv().ok();

    let settings = Cfg::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}

/// Resolve the `config` directory of a crate, whether the process runs from the
/// crate directory itself or from the workspace root.
pub fn configuration_directory(crate_dir_name: &str) -> Result<std::path::PathBuf, ApiError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ApiError::Config(anyhow::anyhow!("Failed to determine current directory: {}", e)))?;

    if base_path.ends_with(crate_dir_name) {
        Ok(base_path.join("config"))
    } else {
        Ok(base_path.join(crate_dir_name).join("config"))
    }
}
