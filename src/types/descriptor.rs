//! 运行时类型描述符
//!
//! Rust 没有运行时反射，这里用显式的描述符记录解析器需要的全部类型信息：
//! - 类型种类（接口 / 抽象类型 / 可实例化类）
//! - 泛型参数个数，以及已绑定的类型实参
//! - 基类与实现的接口
//! - 按声明顺序排列的构造函数

use super::constructor::Constructor;
use crate::errors::TypeError;
use lazy_static::lazy_static;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

lazy_static! {
    /// 内建的集合类型 `std::Sequence<E>`，用于请求某个抽象类型的全部实现
    static ref SEQUENCE: Type = TypeBuilder::new("std", "Sequence", TypeKind::Interface)
        .generic(1)
        .build();
}

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// 接口 - 只能作为抽象标识
    Interface,
    /// 抽象类型 - 可以被继承，但不能实例化
    Abstract,
    /// 可实例化的具体类型
    Class,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Abstract => write!(f, "abstract type"),
            TypeKind::Class => write!(f, "class"),
        }
    }
}

/// 类型定义，所有特化共享同一份定义
pub struct TypeDef {
    namespace: String,
    name: String,
    kind: TypeKind,
    arity: usize,
    base: Option<Type>,
    interfaces: Vec<Type>,
    constructors: Vec<Constructor>,
}

impl TypeDef {
    fn same_definition(&self, other: &TypeDef) -> bool {
        self.arity == other.arity && self.name == other.name && self.namespace == other.namespace
    }
}

/// 类型标识：类型定义 + 类型实参
///
/// 泛型类型没有实参时表示开放的泛型定义（例如 `IService<_>`），
/// 有实参时表示封闭类型（例如 `IService<IRepository>`）。
#[derive(Clone)]
pub struct Type {
    def: Arc<TypeDef>,
    args: Arc<[Type]>,
}

impl Type {
    /// 开始描述一个接口
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> TypeBuilder {
        TypeBuilder::new(namespace, name, TypeKind::Interface)
    }

    /// 开始描述一个抽象类型
    pub fn abstract_type(namespace: impl Into<String>, name: impl Into<String>) -> TypeBuilder {
        TypeBuilder::new(namespace, name, TypeKind::Abstract)
    }

    /// 开始描述一个可实例化的类型
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> TypeBuilder {
        TypeBuilder::new(namespace, name, TypeKind::Class)
    }

    /// `std::Sequence<element>`
    pub fn sequence_of(element: &Type) -> Type {
        Type {
            def: SEQUENCE.def.clone(),
            args: Arc::from(vec![element.clone()]),
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn namespace(&self) -> &str {
        &self.def.namespace
    }

    /// `namespace::Name`，不含类型实参
    pub fn qualified_name(&self) -> String {
        if self.def.namespace.is_empty() {
            self.def.name.clone()
        } else {
            format!("{}::{}", self.def.namespace, self.def.name)
        }
    }

    pub fn kind(&self) -> TypeKind {
        self.def.kind
    }

    /// 泛型参数个数
    pub fn arity(&self) -> usize {
        self.def.arity
    }

    pub fn type_arguments(&self) -> &[Type] {
        &self.args
    }

    pub fn base(&self) -> Option<&Type> {
        self.def.base.as_ref()
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.def.constructors
    }

    pub fn is_generic(&self) -> bool {
        self.def.arity > 0
    }

    /// 开放的泛型定义：泛型且尚未绑定实参
    pub fn is_open(&self) -> bool {
        self.def.arity > 0 && self.args.is_empty()
    }

    pub fn is_sequence(&self) -> bool {
        self.same_definition(&SEQUENCE)
    }

    /// 集合请求的元素类型
    pub fn sequence_element(&self) -> Option<&Type> {
        if self.is_sequence() {
            self.args.first()
        } else {
            None
        }
    }

    /// 对应的开放泛型定义；非泛型类型返回自身
    pub fn definition(&self) -> Type {
        if self.args.is_empty() {
            return self.clone();
        }
        Type {
            def: self.def.clone(),
            args: Arc::from(Vec::new()),
        }
    }

    /// 用类型实参特化开放的泛型定义
    pub fn close<I>(&self, arguments: I) -> Result<Type, TypeError>
    where
        I: IntoIterator<Item = Type>,
    {
        if !self.is_open() {
            return Err(TypeError::NotGenericDefinition(self.to_string()));
        }
        let args: Vec<Type> = arguments.into_iter().collect();
        if args.len() != self.def.arity {
            return Err(TypeError::ArityMismatch {
                ty: self.qualified_name(),
                expected: self.def.arity,
                actual: args.len(),
            });
        }
        Ok(Type {
            def: self.def.clone(),
            args: Arc::from(args),
        })
    }

    /// 是否共享同一个泛型定义（忽略类型实参）
    pub fn same_definition(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.def, &other.def) || self.def.same_definition(&other.def)
    }

    /// 沿基类链查找；封闭类型的泛型基类按自身实参特化后比较
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        let mut current = self.base().map(|base| self.substitute(base));
        while let Some(base) = current {
            if &base == other {
                return true;
            }
            current = base.base().map(|next| base.substitute(next));
        }
        false
    }

    /// 把定义上声明的开放泛型（基类或接口）用本类型的实参封闭
    ///
    /// 声明形式 `IService<_>` 表示按顺序使用本类型的全部类型参数。
    /// 本类型未封闭或参数个数不一致时保持声明形式。
    fn substitute(&self, declared: &Type) -> Type {
        if self.args.is_empty() || !declared.is_open() || declared.arity() != self.args.len() {
            return declared.clone();
        }
        declared
            .close(self.args.iter().cloned())
            .unwrap_or_else(|_| declared.clone())
    }

    /// 实现的全部接口：直接声明的、接口继承的、以及基类链上的。
    /// 封闭类型返回特化后的接口，例如 `ServiceImpl<Repo>` 返回 `IService<Repo>`
    pub fn interfaces(&self) -> Vec<Type> {
        let mut collected = Vec::new();
        self.collect_interfaces(&mut collected);
        collected
    }

    fn collect_interfaces(&self, collected: &mut Vec<Type>) {
        for declared in &self.def.interfaces {
            let interface = self.substitute(declared);
            if !collected.contains(&interface) {
                collected.push(interface.clone());
                interface.collect_interfaces(collected);
            }
        }
        if let Some(base) = self.base() {
            self.substitute(base).collect_interfaces(collected);
        }
    }

    pub fn implements(&self, interface: &Type) -> bool {
        self.interfaces().iter().any(|candidate| candidate == interface)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.same_definition(other) && self.args == other.args
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.def.namespace.hash(state);
        self.def.name.hash(state);
        self.def.arity.hash(state);
        self.args.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())?;
        if self.def.arity == 0 {
            return Ok(());
        }
        write!(f, "<")?;
        if self.args.is_empty() {
            let placeholders = vec!["_"; self.def.arity];
            write!(f, "{}", placeholders.join(", "))?;
        } else {
            for (position, arg) in self.args.iter().enumerate() {
                if position > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
        }
        write!(f, ">")
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self)
    }
}

/// 类型描述构建器
pub struct TypeBuilder {
    def: TypeDef,
}

impl TypeBuilder {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            def: TypeDef {
                namespace: namespace.into(),
                name: name.into(),
                kind,
                arity: 0,
                base: None,
                interfaces: Vec::new(),
                constructors: Vec::new(),
            },
        }
    }

    /// 声明泛型参数个数
    pub fn generic(mut self, arity: usize) -> Self {
        self.def.arity = arity;
        self
    }

    pub fn extends(mut self, base: &Type) -> Self {
        self.def.base = Some(base.clone());
        self
    }

    pub fn implements(mut self, interface: &Type) -> Self {
        self.def.interfaces.push(interface.clone());
        self
    }

    /// 追加构造函数，解析时按追加顺序尝试
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.def.constructors.push(constructor);
        self
    }

    pub fn build(self) -> Type {
        Type {
            def: Arc::new(self.def),
            args: Arc::from(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> Type {
        Type::interface("app", "IRepository").build()
    }

    #[test]
    fn test_close_open_generic() {
        let service = Type::interface("app", "IService").generic(1).build();
        assert!(service.is_open());

        let closed = service.close([repository()]).unwrap();
        assert!(!closed.is_open());
        assert!(closed.same_definition(&service));
        assert_ne!(closed, service);
        assert_eq!(closed.definition(), service);
        assert_eq!(closed.to_string(), "app::IService<app::IRepository>");
        assert_eq!(service.to_string(), "app::IService<_>");
    }

    #[test]
    fn test_close_rejects_bad_arity() {
        let pair = Type::class("app", "Pair").generic(2).build();
        let err = pair.close([repository()]).unwrap_err();
        assert!(matches!(err, TypeError::ArityMismatch { expected: 2, actual: 1, .. }));

        let closed = pair.close([repository(), repository()]).unwrap();
        assert!(matches!(
            closed.close([repository(), repository()]),
            Err(TypeError::NotGenericDefinition(_))
        ));
    }

    #[test]
    fn test_identity_is_by_qualified_definition() {
        let a = Type::interface("app", "ILogger").build();
        let b = Type::interface("app", "ILogger").build();
        let other = Type::interface("infra", "ILogger").build();

        assert_eq!(a, b);
        assert_ne!(a, other);
    }

    #[test]
    fn test_interfaces_follow_base_chain_and_inheritance() {
        let readable = Type::interface("io", "IReadable").build();
        let stream = Type::interface("io", "IStream").implements(&readable).build();
        let base = Type::abstract_type("io", "StreamBase").implements(&stream).build();
        let file = Type::class("io", "FileStream").extends(&base).build();

        assert!(file.is_subtype_of(&base));
        assert!(!base.is_subtype_of(&file));
        assert!(file.implements(&stream));
        assert!(file.implements(&readable));
        assert_eq!(file.interfaces().len(), 2);
    }

    #[test]
    fn test_closed_type_reports_closed_interfaces_and_bases() {
        let service = Type::interface("app", "IService").generic(1).build();
        let base = Type::abstract_type("app", "ServiceBase").generic(1).build();
        let implementation = Type::class("app", "ServiceImpl")
            .generic(1)
            .extends(&base)
            .implements(&service)
            .build();

        // 开放定义保持声明形式
        assert_eq!(implementation.interfaces(), vec![service.clone()]);
        assert!(implementation.is_subtype_of(&base));

        let closed = implementation.close([repository()]).unwrap();
        let closed_service = service.close([repository()]).unwrap();
        let closed_base = base.close([repository()]).unwrap();
        assert_eq!(closed.interfaces(), vec![closed_service.clone()]);
        assert!(closed.implements(&closed_service));
        assert!(!closed.implements(&service));
        assert!(closed.is_subtype_of(&closed_base));
        assert!(!closed.is_subtype_of(&base));
    }

    #[test]
    fn test_sequence_type() {
        let seq = Type::sequence_of(&repository());
        assert!(seq.is_sequence());
        assert_eq!(seq.sequence_element(), Some(&repository()));
        assert!(!repository().is_sequence());
        assert_eq!(seq.to_string(), "std::Sequence<app::IRepository>");
    }
}
