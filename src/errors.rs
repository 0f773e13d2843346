use crate::container::Lifetime;
use crate::types::{Type, TypeKind};
use thiserror::Error;

/// 配置校验失败 - 由 `Resolver::new` 返回，解析器不会被创建
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("Registration #{index}: '{concrete}' is a {kind} and cannot be instantiated")]
    NotInstantiable {
        index: usize,
        concrete: Type,
        kind: TypeKind,
    },
    #[error("Registration #{index}: '{concrete}' is not assignable to '{abstract_type}' ({lifetime:?})")]
    NotAssignable {
        index: usize,
        abstract_type: Type,
        concrete: Type,
        lifetime: Lifetime,
    },
}

impl ConfigurationError {
    /// 出错的注册记录位置
    pub fn index(&self) -> usize {
        match self {
            ConfigurationError::NotInstantiable { index, .. }
            | ConfigurationError::NotAssignable { index, .. } => *index,
        }
    }
}

/// 构造函数执行失败，解析器会继续尝试下一个构造函数
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Argument #{index} is absent")]
    MissingArgument { index: usize },
    #[error("Argument #{index} is not a '{expected}'")]
    WrongArgumentType { index: usize, expected: &'static str },
    #[error("Constructor rejected its arguments: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("'{ty}' expects {expected} type argument(s), got {actual}")]
    ArityMismatch {
        ty: String,
        expected: usize,
        actual: usize,
    },
    #[error("'{0}' is not an open generic definition")]
    NotGenericDefinition(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse config file '{0}': {1}")]
    Parse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for environment variable {key}")]
    InvalidEnv { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{0}': {1}")]
    Filter(String, String),
    #[error("A global tracing subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}
