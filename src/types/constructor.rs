//! 构造函数描述
//!
//! 每个构造函数是一份预先声明的构建计划：有序的参数描述 + 构建闭包。
//! 解析器负责为参数准备实参，闭包只负责把实参组装成值。

use super::descriptor::Type;
use super::instance::Instance;
use crate::errors::BuildError;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的构建闭包
pub type BuildFn =
    dyn Fn(&Type, Args) -> Result<Arc<dyn Any + Send + Sync>, BuildError> + Send + Sync;

/// 构造函数参数描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// 固定类型的参数
    Type(Type),
    /// 被构造类型的第 N 个类型实参，特化之后才能确定
    TypeArgument(usize),
}

impl Param {
    /// 针对具体的被构造类型求出参数类型
    pub fn resolve(&self, owner: &Type) -> Option<Type> {
        match self {
            Param::Type(ty) => Some(ty.clone()),
            Param::TypeArgument(index) => owner.type_arguments().get(*index).cloned(),
        }
    }
}

impl From<&Type> for Param {
    fn from(ty: &Type) -> Self {
        Param::Type(ty.clone())
    }
}

#[derive(Clone)]
pub struct Constructor {
    params: Vec<Param>,
    build: Arc<BuildFn>,
}

impl Constructor {
    pub fn new<F, T>(params: Vec<Param>, build: F) -> Self
    where
        F: Fn(&Type, Args) -> Result<T, BuildError> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self {
            params,
            build: Arc::new(move |ty, args| {
                build(ty, args).map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
            }),
        }
    }

    /// 无参构造函数
    pub fn nullary<F, T>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self::new(Vec::new(), move |_, _| Ok(factory()))
    }

    /// 通过 `Default` 构造
    pub fn default_of<T>() -> Self
    where
        T: Default + Any + Send + Sync,
    {
        Self::nullary(T::default)
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn invoke(&self, ty: &Type, args: Args) -> Result<Arc<dyn Any + Send + Sync>, BuildError> {
        (self.build)(ty, args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// 解析器为一次构造准备的实参，缺失的依赖为 `None`
#[derive(Debug, Clone, Default)]
pub struct Args(Vec<Option<Instance>>);

impl Args {
    pub fn new(values: Vec<Option<Instance>>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instance> {
        self.0.get(index).and_then(Option::as_ref)
    }

    /// 可缺失的依赖
    pub fn optional(&self, index: usize) -> Option<Instance> {
        self.get(index).cloned()
    }

    pub fn required(&self, index: usize) -> Result<Instance, BuildError> {
        self.optional(index)
            .ok_or(BuildError::MissingArgument { index })
    }

    pub fn downcast<T>(&self, index: usize) -> Result<Arc<T>, BuildError>
    where
        T: Any + Send + Sync,
    {
        self.required(index)?
            .downcast::<T>()
            .ok_or(BuildError::WrongArgumentType {
                index,
                expected: type_name::<T>(),
            })
    }

    /// 集合参数的全部元素
    pub fn sequence(&self, index: usize) -> Result<Vec<Instance>, BuildError> {
        let instance = self.required(index)?;
        instance
            .as_sequence()
            .map(<[Instance]>::to_vec)
            .ok_or(BuildError::WrongArgumentType {
                index,
                expected: "std::Sequence",
            })
    }
}
