use super::descriptor::Type;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 解析结果：类型擦除的共享值 + 构造时的运行时类型
#[derive(Clone)]
pub struct Instance {
    ty: Type,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new(ty: Type, value: Arc<dyn Any + Send + Sync>) -> Self {
        Self { ty, value }
    }

    pub fn from_value<T>(ty: Type, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::new(ty, Arc::new(value))
    }

    /// 集合请求的结果，元素按注册顺序排列
    pub(crate) fn sequence(ty: Type, items: Vec<Instance>) -> Self {
        Self::from_value(ty, items)
    }

    /// 实际构造出的类型（开放泛型会是特化之后的类型）
    pub fn runtime_type(&self) -> &Type {
        &self.ty
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.value.clone().downcast::<T>().ok()
    }

    /// 是否为同一个实例
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    pub fn as_sequence(&self) -> Option<&[Instance]> {
        self.downcast_ref::<Vec<Instance>>().map(Vec::as_slice)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.ty.to_string())
            .finish_non_exhaustive()
    }
}
