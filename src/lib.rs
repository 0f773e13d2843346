//! depinject - 依赖解析引擎
//!
//! 根据注册表把抽象类型映射到具体类型，按需构造完整的对象图：
//! - 单例 / 瞬态生命周期
//! - 开放泛型注册，按请求的类型实参特化
//! - 集合请求（`Sequence<E>`）返回全部实现
//! - 循环依赖检测
//!
//! ```
//! use depinject::{Constructor, Registry, Resolver, Type};
//!
//! struct Greeter;
//!
//! let greet = Type::interface("app", "IGreet").build();
//! let greeter = Type::class("app", "Greeter")
//!     .implements(&greet)
//!     .constructor(Constructor::nullary(|| Greeter))
//!     .build();
//!
//! let mut registry = Registry::new();
//! registry.register_singleton(&greet, &greeter);
//!
//! let resolver = Resolver::new(registry).unwrap();
//! let instance = resolver.resolve(&greet).unwrap();
//! assert_eq!(instance.runtime_type(), &greeter);
//! assert!(instance.is::<Greeter>());
//! ```

pub mod config;
pub mod container;
pub mod errors;
pub mod logging;
pub mod types;

// Re-export commonly used items for convenience
pub use config::{ConfigLoader, ResolverConfig};
pub use container::{Assignability, Lifetime, Registration, Registry, Resolver, ResolverStats};
pub use errors::{BuildError, ConfigError, ConfigurationError, LoggingError, TypeError};
pub use types::{Args, Constructor, Instance, Param, Type, TypeKind};
