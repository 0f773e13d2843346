//! 配置校验
//!
//! 纯函数，在解析器创建前检查每条注册记录：
//! 1. 具体类型必须可实例化
//! 2. 具体类型必须能赋值给抽象类型

use super::registry::Registration;
use super::Lifetime;
use crate::errors::ConfigurationError;
use crate::types::{Type, TypeKind};

/// 具体类型与抽象类型之间的关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assignability {
    /// 同一类型
    Exact,
    /// 基类链上包含抽象类型
    Subtype,
    /// 实现了抽象类型（接口）
    InterfaceImpl,
    /// 实现了同一泛型定义的某个接口，仅瞬态注册允许
    OpenGenericImpl,
}

pub fn assignability(abstract_type: &Type, concrete: &Type, lifetime: Lifetime) -> Option<Assignability> {
    if concrete == abstract_type {
        return Some(Assignability::Exact);
    }
    if concrete.is_subtype_of(abstract_type) {
        return Some(Assignability::Subtype);
    }

    let interfaces = concrete.interfaces();
    if interfaces.contains(abstract_type) {
        return Some(Assignability::InterfaceImpl);
    }
    if lifetime == Lifetime::InstancePerDependency
        && abstract_type.is_generic()
        && interfaces
            .iter()
            .any(|interface| interface.is_generic() && interface.same_definition(abstract_type))
    {
        return Some(Assignability::OpenGenericImpl);
    }
    None
}

/// 校验全部记录，返回第一条不合法记录的错误
pub fn validate(records: &[Registration]) -> Result<(), ConfigurationError> {
    for (index, record) in records.iter().enumerate() {
        let concrete = record.concrete_type();
        if concrete.kind() != TypeKind::Class {
            return Err(ConfigurationError::NotInstantiable {
                index,
                concrete: concrete.clone(),
                kind: concrete.kind(),
            });
        }
        if record.shape().is_none() {
            return Err(ConfigurationError::NotAssignable {
                index,
                abstract_type: record.abstract_type().clone(),
                concrete: concrete.clone(),
                lifetime: record.lifetime(),
            });
        }
    }
    Ok(())
}

pub fn is_configuration_valid(records: &[Registration]) -> bool {
    validate(records).is_ok()
}
