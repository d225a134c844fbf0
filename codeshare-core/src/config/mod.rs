use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Environment prefix for overrides, e.g. `APP_API__BASE_URL`.
pub const ENV_PREFIX: &str = "APP";

/// Resolve `<crate_dir>/config` whether the binary runs from the workspace
/// root or from inside the crate directory.
pub fn configuration_directory(crate_dir: &str) -> Result<PathBuf, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;

    if base_path.ends_with(crate_dir) {
        Ok(base_path.join("config"))
    } else {
        Ok(base_path.join(crate_dir).join("config"))
    }
}

/// Load settings from `<config_dir>/<file_name>` layered under `APP_*`
/// environment variables.
///
/// Keys listed in `list_keys` are split on spaces when they come from the
/// environment, so `APP_CLIPBOARD__COMMAND="xclip -selection clipboard"`
/// becomes a three element argv.
pub fn load_settings<T: DeserializeOwned>(
    config_dir: &Path,
    file_name: &str,
    list_keys: &[&str],
) -> Result<T, ConfigError> {
    dotenvy::dotenv().ok();

    let mut environment = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__");

    if !list_keys.is_empty() {
        environment = environment.try_parsing(true).list_separator(" ");
        for key in list_keys {
            environment = environment.with_list_parse_key(key);
        }
    }

    let settings = Config::builder()
        .add_source(File::from(config_dir.join(file_name)).required(true))
        .add_source(environment)
        .build()?;

    settings.try_deserialize::<T>()
}
