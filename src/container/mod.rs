//! 依赖注入容器
//!
//! - `registry`：注册记录（抽象类型 -> 具体类型 -> 生命周期）
//! - `validator`：解析前的结构校验
//! - `resolver`：递归构造、泛型特化、循环检测、单例缓存

pub mod registry;
pub mod resolver;
pub mod stack;
pub mod stats;
pub mod validator;

pub use registry::{Registration, Registry};
pub use resolver::Resolver;
pub use stack::ResolutionStack;
pub use stats::ResolverStats;
pub use validator::{is_configuration_valid, validate, Assignability};

/// 服务生命周期，只影响缓存策略，不参与类型匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// 每条注册记录在解析器内只有一个实例
    Singleton,
    /// 每次解析都创建新实例
    InstancePerDependency,
}
