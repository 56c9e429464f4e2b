use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tidings::DispatcherConfig;
use tidings::logger::LoggerConfig;

const DEFAULT_CONFIG: &str = "tidings";
const DEFAULT_ORDERS: u32 = 3;

/// Settings of the demo binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub logger: LoggerConfig,
    pub dispatcher: DispatcherConfig,
    pub orders: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            logger: LoggerConfig::default(),
            dispatcher: DispatcherConfig::default(),
            orders: DEFAULT_ORDERS,
        }
    }
}

/// Layers a configuration file with `TIDINGS__` environment overrides.
///
/// An explicit `path` must exist. Without one, `tidings.{toml,yaml,json}` in the
/// working directory is used when present and the defaults otherwise. Nested keys
/// are separated by double underscores (`TIDINGS__LOGGER__LEVEL` maps to `logger.level`).
///
/// # Errors
/// Fails when the file is missing or malformed, or a value does not match [`DemoConfig`].
pub fn load_config(path: Option<&Path>) -> Result<DemoConfig, config::ConfigError> {
    load_layered(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix("TIDINGS")
        .prefix_separator("__")
        .separator("__")
        .convert_case(config::Case::Snake)
        .try_parsing(true)
}

fn load_layered(
    path: Option<&Path>,
    environment: Environment,
) -> Result<DemoConfig, config::ConfigError> {
    let (effective_path, required) =
        path.map_or_else(|| (PathBuf::from(DEFAULT_CONFIG), false), |p| (p.to_path_buf(), true));

    Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(environment)
        .build()?
        .try_deserialize()
}
