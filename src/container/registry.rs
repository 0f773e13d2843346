//! 注册表
//!
//! 按注册顺序保存记录，以 (抽象类型, 具体类型) 去重。

use super::validator::{assignability, Assignability};
use super::Lifetime;
use crate::types::Type;
use tracing::debug;

/// 注册记录，创建后不可修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    abstract_type: Type,
    concrete_type: Type,
    lifetime: Lifetime,
    shape: Option<Assignability>,
}

impl Registration {
    fn new(abstract_type: Type, concrete_type: Type, lifetime: Lifetime) -> Self {
        let shape = assignability(&abstract_type, &concrete_type, lifetime);
        Self {
            abstract_type,
            concrete_type,
            lifetime,
            shape,
        }
    }

    /// 抽象标识，泛型时总是开放定义
    pub fn abstract_type(&self) -> &Type {
        &self.abstract_type
    }

    pub fn concrete_type(&self) -> &Type {
        &self.concrete_type
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// 注册时确定的赋值关系；`None` 表示具体类型无法赋值给抽象类型
    pub fn shape(&self) -> Option<Assignability> {
        self.shape
    }

    /// 请求与抽象标识共享同一个类型定义即视为匹配（忽略类型实参）
    pub fn serves(&self, requested: &Type) -> bool {
        self.abstract_type.same_definition(requested)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: Vec<Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册服务
    ///
    /// 封闭泛型的抽象类型会被归一化为开放定义。相同的 (抽象, 具体) 组合
    /// 只保留第一次注册，后续注册（即使生命周期不同）被忽略。
    /// 返回是否新增了记录。
    pub fn register(&mut self, abstract_type: &Type, concrete_type: &Type, lifetime: Lifetime) -> bool {
        let abstract_type = abstract_type.definition();
        let duplicate = self.records.iter().any(|record| {
            record.abstract_type == abstract_type && record.concrete_type == *concrete_type
        });
        if duplicate {
            debug!(
                abstract_type = %abstract_type,
                concrete_type = %concrete_type,
                "Duplicate registration ignored"
            );
            return false;
        }

        self.records
            .push(Registration::new(abstract_type, concrete_type.clone(), lifetime));
        true
    }

    /// 注册单例服务
    pub fn register_singleton(&mut self, abstract_type: &Type, concrete_type: &Type) -> bool {
        self.register(abstract_type, concrete_type, Lifetime::Singleton)
    }

    /// 注册瞬态服务
    pub fn register_per_dependency(&mut self, abstract_type: &Type, concrete_type: &Type) -> bool {
        self.register(abstract_type, concrete_type, Lifetime::InstancePerDependency)
    }

    pub fn records(&self) -> &[Registration] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Registration> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按注册顺序找到第一条匹配的记录
    pub fn find(&self, requested: &Type) -> Option<(usize, &Registration)> {
        self.records
            .iter()
            .enumerate()
            .find(|(_, record)| record.serves(requested))
    }

    /// 按注册顺序返回全部匹配的记录
    pub fn find_all<'a>(
        &'a self,
        requested: &'a Type,
    ) -> impl Iterator<Item = (usize, &'a Registration)> + 'a {
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, record)| record.serves(requested))
    }

    pub fn serves(&self, requested: &Type) -> bool {
        self.records.iter().any(|record| record.serves(requested))
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Registration;
    type IntoIter = std::slice::Iter<'a, Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
