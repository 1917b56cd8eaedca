//! Configuration file loader with multi-source merging

use super::file_config::{ConfigValidationError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const APP_DIR: &str = "toolbench";
const PROJECT_FILES: [&str; 2] = ["toolbench.toml", ".toolbench.toml"];
const ENV_PREFIX: &str = "TOOLBENCH_";

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error(
        "Invalid configuration: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Invalid(Vec<ConfigValidationError>),
}

/// File locations merged by [`ConfigLoader::load_from`]
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub explicit: Option<PathBuf>,
    /// Merge `TOOLBENCH_` environment variables last
    pub env: bool,
}

impl ConfigSources {
    /// Standard discovery relative to the current directory
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self {
            global: ConfigLoader::global_config_path(),
            project: ConfigLoader::project_config_path(Path::new(".")),
            explicit: explicit.map(Path::to_path_buf),
            env: true,
        }
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all standard sources and validate it
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Self::load_from(&ConfigSources::discover(config_path))
    }

    /// Merge the given sources over the defaults and validate the result
    pub fn load_from(sources: &ConfigSources) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global) = sources.global.as_ref().filter(|p| p.exists()) {
            debug!(path = %global.display(), "Merging global config");
            figment = figment.merge(Toml::file(global));
        }

        if let Some(project) = sources.project.as_ref().filter(|p| p.exists()) {
            debug!(path = %project.display(), "Merging project config");
            figment = figment.merge(Toml::file(project));
        }

        // An explicit path that does not exist is an error, not a silent skip
        if let Some(path) = &sources.explicit {
            debug!(path = %path.display(), "Merging explicit config");
            figment = figment.merge(Toml::file_exact(path));
        }

        if sources.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        let config: FileConfig = figment.extract().map_err(Box::new)?;
        Self::validated(config)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn validated(config: FileConfig) -> Result<FileConfig, ConfigError> {
        let issues = config.validate();
        if issues.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/toolbench/config.toml if set,
    /// otherwise the platform config directory equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used
    pub fn describe_sources(sources: &ConfigSources) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        if let Some(path) = &sources.explicit {
            lines.push(format!("  [FOUND] Explicit: {}", path.display()));
        }

        match &sources.project {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push(format!(
                "  [     ] Project: ./{} or ./{}",
                PROJECT_FILES[0], PROJECT_FILES[1]
            )),
        }

        if let Some(path) = &sources.global {
            let marker = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", marker, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}
