use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const ENV_PREFIX: &str = "DEPINJECT_";
pub const ENV_EAGER_SINGLETONS: &str = "DEPINJECT_EAGER_SINGLETONS";
pub const ENV_SPECIALIZE_OPEN_GENERIC_SINGLETONS: &str =
    "DEPINJECT_SPECIALIZE_OPEN_GENERIC_SINGLETONS";

/// Resolver behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Build every singleton registration while the resolver is created.
    pub eager_singletons: bool,
    /// Cache open-generic singletons per type-argument list instead of
    /// falling back to the unspecialized per-registration slot.
    pub specialize_open_generic_singletons: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            eager_singletons: true,
            specialize_open_generic_singletons: false,
        }
    }
}

/// `[resolver]` table as written in the config file; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PartialResolverConfig {
    pub eager_singletons: Option<bool>,
    pub specialize_open_generic_singletons: Option<bool>,
}

/// Top-level layout of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub resolver: PartialResolverConfig,
}

impl ResolverConfig {
    /// Merge file values with environment overrides. Environment wins, then
    /// the file, then the defaults.
    pub fn from_partial_and_env(
        partial: PartialResolverConfig,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let eager_singletons = match env.get(ENV_EAGER_SINGLETONS) {
            Some(value) => parse_bool(ENV_EAGER_SINGLETONS, value)?,
            None => partial.eager_singletons.unwrap_or(defaults.eager_singletons),
        };
        let specialize_open_generic_singletons =
            match env.get(ENV_SPECIALIZE_OPEN_GENERIC_SINGLETONS) {
                Some(value) => parse_bool(ENV_SPECIALIZE_OPEN_GENERIC_SINGLETONS, value)?,
                None => partial
                    .specialize_open_generic_singletons
                    .unwrap_or(defaults.specialize_open_generic_singletons),
            };

        Ok(Self {
            eager_singletons,
            specialize_open_generic_singletons,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
