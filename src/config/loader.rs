use std::{collections::HashMap, env, fs, path::PathBuf};

use tracing::debug;

use super::resolver_config::{ConfigFile, PartialResolverConfig, ResolverConfig, ENV_PREFIX};
use crate::errors::ConfigError;

/// Configuration loader responsible for loading resolver config from a file and the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader without a config file: defaults plus environment
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Loader reading the given TOML file (`~` is expanded)
    pub fn with_path(path: &str) -> Self {
        let expanded = shellexpand::tilde(path);
        Self {
            path: Some(PathBuf::from(expanded.as_ref())),
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Load complete resolver configuration
    pub fn load(&self) -> Result<ResolverConfig, ConfigError> {
        let partial = self.load_partial()?;
        let env_map = Self::collect_env_vars();
        ResolverConfig::from_partial_and_env(partial, &env_map)
    }

    /// Read the `[resolver]` table; a missing file yields an empty partial config
    pub fn load_partial(&self) -> Result<PartialResolverConfig, ConfigError> {
        let Some(path) = &self.path else {
            return Ok(PartialResolverConfig::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(PartialResolverConfig::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.display().to_string(), e))?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse config file content
    pub fn parse(content: &str, origin: &str) -> Result<PartialResolverConfig, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(origin.to_string(), e))?;
        Ok(file.resolver)
    }

    /// Collect `DEPINJECT_*` environment variables
    fn collect_env_vars() -> HashMap<String, String> {
        env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}
