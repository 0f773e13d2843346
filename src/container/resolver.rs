//! 解析器
//!
//! 递归构造对象图：
//! - 按注册顺序查找匹配的记录
//! - 开放泛型按请求的类型实参特化
//! - 单例按注册记录缓存（`DashMap`，先写入者胜出）
//! - 调用级的解析栈截断循环依赖
//!
//! 构造失败不会返回错误：无法构建的类型解析为 `None`，
//! 并作为缺失的依赖传给上层构造函数。调用方需要自行检查。

use super::registry::{Registration, Registry};
use super::stack::ResolutionStack;
use super::stats::{InnerStats, ResolverStats};
use super::validator;
use super::Lifetime;
use crate::config::ResolverConfig;
use crate::errors::ConfigurationError;
use crate::logging::OperationTimer;
use crate::types::{Args, Instance, Param, Type, TypeKind};
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// 单例缓存键：注册记录 + 特化使用的类型实参（未特化时为空）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SingletonKey {
    record: usize,
    type_arguments: Vec<Type>,
}

impl SingletonKey {
    fn record(record: usize) -> Self {
        Self {
            record,
            type_arguments: Vec::new(),
        }
    }

    fn specialized(record: usize, type_arguments: &[Type]) -> Self {
        Self {
            record,
            type_arguments: type_arguments.to_vec(),
        }
    }
}

/// 依赖解析器，创建后注册表只读，可在线程间共享
pub struct Resolver {
    registry: Arc<Registry>,
    singletons: DashMap<SingletonKey, Instance>,
    config: ResolverConfig,
    stats: InnerStats,
}

impl Resolver {
    /// 使用默认配置创建解析器
    pub fn new(registry: impl Into<Arc<Registry>>) -> Result<Self, ConfigurationError> {
        Self::with_config(registry, ResolverConfig::default())
    }

    /// 校验配置并（默认）预先构造全部单例
    pub fn with_config(
        registry: impl Into<Arc<Registry>>,
        config: ResolverConfig,
    ) -> Result<Self, ConfigurationError> {
        let registry = registry.into();
        if let Err(err) = validator::validate(registry.records()) {
            error!(error = %err, "Dependency configuration rejected");
            return Err(err);
        }

        let resolver = Self {
            registry,
            singletons: DashMap::new(),
            config,
            stats: InnerStats::default(),
        };
        if resolver.config.eager_singletons {
            resolver.warm_singletons();
        }

        info!(
            registrations = resolver.registry.len(),
            singletons = resolver.singletons.len(),
            "Resolver ready"
        );
        Ok(resolver)
    }

    /// 每条单例记录各自解析一次，写入该记录自己的缓存槽位
    fn warm_singletons(&self) {
        let timer = OperationTimer::new("warm_singletons")
            .with_metadata("registrations", &self.registry.len().to_string());

        for (index, record) in self.registry.iter().enumerate() {
            if record.lifetime() != Lifetime::Singleton {
                continue;
            }
            let mut stack = ResolutionStack::new();
            stack.push(record.abstract_type().clone());
            if self.materialize(index, record, &[], &mut stack).is_none() {
                debug!(
                    abstract_type = %record.abstract_type(),
                    concrete_type = %record.concrete_type(),
                    "Singleton could not be built eagerly"
                );
            }
        }

        timer.finish();
    }

    /// 解析服务
    ///
    /// `Sequence<E>` 请求返回全部匹配 `E` 的实现（按注册顺序），
    /// 其它请求返回第一条匹配记录构造出的实例。
    /// 无匹配记录、构造失败或遇到循环依赖时返回 `None`。
    pub fn resolve(&self, requested: &Type) -> Option<Instance> {
        let mut stack = ResolutionStack::new();
        self.resolve_in(requested, &mut stack)
    }

    /// 解析某个抽象类型的全部实现
    pub fn resolve_all(&self, element: &Type) -> Vec<Instance> {
        self.resolve(&Type::sequence_of(element))
            .and_then(|instance| instance.as_sequence().map(<[Instance]>::to_vec))
            .unwrap_or_default()
    }

    /// 解析并向下转型为具体的 Rust 类型
    pub fn resolve_as<T>(&self, requested: &Type) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.resolve(requested)?.downcast::<T>()
    }

    pub fn is_registered(&self, requested: &Type) -> bool {
        match requested.sequence_element() {
            Some(element) => self.registry.serves(element),
            None => self.registry.serves(requested),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats.snapshot(self.registry.len(), self.singletons.len())
    }

    fn resolve_in(&self, requested: &Type, stack: &mut ResolutionStack) -> Option<Instance> {
        InnerStats::bump(&self.stats.total_resolutions);

        if stack.contains(requested) {
            InnerStats::bump(&self.stats.cycle_breaks);
            debug!(
                requested = %requested,
                chain = %stack.chain(),
                "Circular dependency detected, branch resolves to absent"
            );
            return None;
        }

        stack.push(requested.clone());
        let result = match requested.sequence_element() {
            Some(element) => Some(self.collect(requested, element, stack)),
            None => self.resolve_single(requested, stack),
        };
        stack.pop();
        result
    }

    fn resolve_single(&self, requested: &Type, stack: &mut ResolutionStack) -> Option<Instance> {
        let Some((index, record)) = self.registry.find(requested) else {
            InnerStats::bump(&self.stats.unmatched_requests);
            debug!(requested = %requested, "No registration matches requested type");
            return None;
        };
        self.materialize(index, record, requested.type_arguments(), stack)
    }

    fn collect(&self, requested: &Type, element: &Type, stack: &mut ResolutionStack) -> Instance {
        let items: Vec<Instance> = self
            .registry
            .find_all(element)
            .filter_map(|(index, record)| {
                self.materialize(index, record, element.type_arguments(), stack)
            })
            .collect();
        debug!(element = %element, count = items.len(), "Collected implementations");
        Instance::sequence(requested.clone(), items)
    }

    fn materialize(
        &self,
        index: usize,
        record: &Registration,
        type_arguments: &[Type],
        stack: &mut ResolutionStack,
    ) -> Option<Instance> {
        let concrete = record.concrete_type();

        if concrete.is_open() && !type_arguments.is_empty() {
            match record.lifetime() {
                Lifetime::InstancePerDependency => {
                    let specialized = self.specialize(concrete, type_arguments)?;
                    InnerStats::bump(&self.stats.transient_creations);
                    return self.construct(&specialized, stack);
                }
                Lifetime::Singleton if self.config.specialize_open_generic_singletons => {
                    let specialized = self.specialize(concrete, type_arguments)?;
                    let key = SingletonKey::specialized(index, type_arguments);
                    return self.singleton(key, &specialized, stack);
                }
                // 不特化，落到按记录缓存的槽位
                Lifetime::Singleton => {}
            }
        }

        match record.lifetime() {
            Lifetime::Singleton => self.singleton(SingletonKey::record(index), concrete, stack),
            Lifetime::InstancePerDependency => {
                InnerStats::bump(&self.stats.transient_creations);
                self.construct(concrete, stack)
            }
        }
    }

    fn specialize(&self, open: &Type, type_arguments: &[Type]) -> Option<Type> {
        match open.close(type_arguments.iter().cloned()) {
            Ok(specialized) => Some(specialized),
            Err(err) => {
                InnerStats::bump(&self.stats.construction_failures);
                debug!(error = %err, "Open generic specialization failed");
                None
            }
        }
    }

    fn singleton(
        &self,
        key: SingletonKey,
        concrete: &Type,
        stack: &mut ResolutionStack,
    ) -> Option<Instance> {
        if let Some(cached) = self.singletons.get(&key) {
            InnerStats::bump(&self.stats.singleton_cache_hits);
            trace!(concrete_type = %concrete, "Singleton cache hit");
            return Some(cached.value().clone());
        }

        InnerStats::bump(&self.stats.singleton_cache_misses);
        // 构造期间不持有缓存锁；并发构造时只保留第一个写入的实例
        let built = self.construct(concrete, stack)?;
        let cached = self.singletons.entry(key).or_insert(built).value().clone();
        Some(cached)
    }

    /// 按声明顺序尝试构造函数，第一个成功的胜出
    fn construct(&self, concrete: &Type, stack: &mut ResolutionStack) -> Option<Instance> {
        if concrete.kind() != TypeKind::Class || concrete.is_open() {
            InnerStats::bump(&self.stats.construction_failures);
            debug!(concrete_type = %concrete, "Type is not instantiable");
            return None;
        }

        for (position, constructor) in concrete.constructors().iter().enumerate() {
            let args: Vec<Option<Instance>> = constructor
                .params()
                .iter()
                .map(|param| self.argument(concrete, param, stack))
                .collect();

            match constructor.invoke(concrete, Args::new(args)) {
                Ok(value) => return Some(Instance::new(concrete.clone(), value)),
                Err(err) => debug!(
                    concrete_type = %concrete,
                    constructor = position,
                    error = %err,
                    "Constructor failed, trying next candidate"
                ),
            }
        }

        InnerStats::bump(&self.stats.construction_failures);
        debug!(concrete_type = %concrete, "No constructor could be satisfied");
        None
    }

    /// 已注册的参数递归解析，其它参数尝试无参构造
    ///
    /// `Sequence<E>` 参数仅在 `E` 有注册时解析；否则与其它未注册参数一样，
    /// 集合不是可实例化类型，因此为缺失，构造函数可以借此回退到下一个。
    fn argument(&self, owner: &Type, param: &Param, stack: &mut ResolutionStack) -> Option<Instance> {
        let ty = param.resolve(owner)?;
        if self.is_registered(&ty) {
            self.resolve_in(&ty, stack)
        } else {
            default_instance(&ty)
        }
    }
}

/// 未注册类型的无参构造，失败时为 `None`
fn default_instance(ty: &Type) -> Option<Instance> {
    if ty.kind() != TypeKind::Class || ty.is_open() {
        return None;
    }
    ty.constructors()
        .iter()
        .filter(|constructor| constructor.arity() == 0)
        .find_map(|constructor| constructor.invoke(ty, Args::default()).ok())
        .map(|value| Instance::new(ty.clone(), value))
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("registrations", &self.registry.len())
            .field("singletons", &self.singletons.len())
            .field("config", &self.config)
            .finish()
    }
}
