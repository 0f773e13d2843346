#![allow(dead_code)]
//! 解析器性能基准测试

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use depinject::{Constructor, Instance, Param, Registry, Resolver, Type};

struct Leaf;

struct Chain {
    next: Option<Instance>,
}

/// 构造一条长度为 `depth` 的依赖链，返回链头的抽象类型
fn chain_registry(depth: usize, singleton_leaf: bool) -> (Registry, Type) {
    let mut registry = Registry::new();

    let leaf_interface = Type::interface("bench", "ILeaf").build();
    let leaf = Type::class("bench", "Leaf")
        .implements(&leaf_interface)
        .constructor(Constructor::nullary(|| Leaf))
        .build();
    if singleton_leaf {
        registry.register_singleton(&leaf_interface, &leaf);
    } else {
        registry.register_per_dependency(&leaf_interface, &leaf);
    }

    let mut previous = leaf_interface;
    for level in 0..depth {
        let interface = Type::interface("bench", format!("INode{}", level)).build();
        let node = Type::class("bench", format!("Node{}", level))
            .implements(&interface)
            .constructor(Constructor::new(vec![Param::from(&previous)], |_, args| {
                Ok(Chain {
                    next: args.optional(0),
                })
            }))
            .build();
        registry.register_per_dependency(&interface, &node);
        previous = interface;
    }

    (registry, previous)
}

fn bench_chain_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_resolution");

    for depth in [1usize, 10, 50].iter() {
        let (registry, head) = chain_registry(*depth, false);
        let resolver = Resolver::new(registry).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(depth), &head, |b, head| {
            b.iter(|| black_box(resolver.resolve(head)));
        });
    }

    group.finish();
}

fn bench_singleton_hits(c: &mut Criterion) {
    let (registry, _) = chain_registry(0, true);
    let resolver = Resolver::new(registry).unwrap();
    let leaf = Type::interface("bench", "ILeaf").build();

    c.bench_function("singleton_cache_hit", |b| {
        b.iter(|| black_box(resolver.resolve(&leaf)));
    });
}

fn bench_collection_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_resolution");
    let interface = Type::interface("bench", "IPlugin").build();

    for count in [1usize, 10, 100].iter() {
        let mut registry = Registry::new();
        for index in 0..*count {
            let plugin = Type::class("bench", format!("Plugin{}", index))
                .implements(&interface)
                .constructor(Constructor::nullary(|| Leaf))
                .build();
            registry.register_per_dependency(&interface, &plugin);
        }
        let resolver = Resolver::new(registry).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(count), &interface, |b, interface| {
            b.iter(|| black_box(resolver.resolve_all(interface)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_chain_resolution,
    bench_singleton_hits,
    bench_collection_resolution
);
criterion_main!(benches);
