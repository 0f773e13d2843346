//! 集成测试共用的类型描述

#![allow(dead_code)]

use depinject::{Constructor, Instance, Param, Type};

pub struct ClassFromInterface;
pub struct ClassFromInterface2;
pub struct ClassFromAbstractClass;
pub struct Class;
pub struct RepositoryImpl;

/// 通过构造函数注入仓储的服务
pub struct ServiceImpl {
    pub repository: Option<Instance>,
}

pub struct Fixtures {
    pub interface: Type,
    pub class_from_interface: Type,
    pub class_from_interface2: Type,
    pub abstract_class: Type,
    pub class_from_abstract_class: Type,
    pub class: Type,
    pub repository: Type,
    pub repository_impl: Type,
    pub service: Type,
    pub service_impl: Type,
    /// `IService<_>`
    pub generic_service: Type,
    /// `ServiceImpl<_>`
    pub generic_service_impl: Type,
}

fn service_constructor(repository: &Type) -> Constructor {
    Constructor::new(vec![Param::from(repository)], |_, args| {
        Ok(ServiceImpl {
            repository: args.optional(0),
        })
    })
}

impl Fixtures {
    pub fn new() -> Self {
        let interface = Type::interface("tests", "IInterface").build();
        let abstract_class = Type::abstract_type("tests", "AbstractClass").build();
        let repository = Type::interface("tests", "IRepository").build();
        let service = Type::interface("tests", "IService").build();
        let generic_service = Type::interface("tests", "IService").generic(1).build();

        Self {
            class_from_interface: Type::class("tests", "ClassFromInterface")
                .implements(&interface)
                .constructor(Constructor::nullary(|| ClassFromInterface))
                .build(),
            class_from_interface2: Type::class("tests", "ClassFromInterface2")
                .implements(&interface)
                .constructor(Constructor::nullary(|| ClassFromInterface2))
                .build(),
            class_from_abstract_class: Type::class("tests", "ClassFromAbstractClass")
                .extends(&abstract_class)
                .constructor(Constructor::nullary(|| ClassFromAbstractClass))
                .build(),
            class: Type::class("tests", "Class")
                .constructor(Constructor::nullary(|| Class))
                .build(),
            repository_impl: Type::class("tests", "RepositoryImpl")
                .implements(&repository)
                .constructor(Constructor::nullary(|| RepositoryImpl))
                .build(),
            service_impl: Type::class("tests", "ServiceImpl")
                .implements(&service)
                .constructor(service_constructor(&repository))
                .build(),
            generic_service_impl: Type::class("tests", "ServiceImpl")
                .generic(1)
                .implements(&generic_service)
                .constructor(service_constructor(&repository))
                .build(),
            interface,
            abstract_class,
            repository,
            service,
            generic_service,
        }
    }

    /// `IService<IRepository>`
    pub fn closed_service(&self) -> Type {
        self.generic_service
            .close([self.repository.clone()])
            .expect("IService has one type parameter")
    }

    /// `ServiceImpl<IRepository>`
    pub fn closed_service_impl(&self) -> Type {
        self.generic_service_impl
            .close([self.repository.clone()])
            .expect("ServiceImpl has one type parameter")
    }
}
