pub mod loader;
pub mod resolver_config;

pub use loader::ConfigLoader;
pub use resolver_config::{
    ConfigFile, PartialResolverConfig, ResolverConfig, ENV_EAGER_SINGLETONS,
    ENV_SPECIALIZE_OPEN_GENERIC_SINGLETONS,
};
