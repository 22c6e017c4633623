use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_graph::{Codec, Describe, GeneratedCodec, Options, Record, ReflectiveCodec, Registry, TagMode};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

impl Record for User {
    fn describe(d: &mut Describe<Self>) {
        d.member("Id", |u| &u.id, |u| &mut u.id);
        d.member("Name", |u| &u.name, |u| &mut u.name);
        d.member("Email", |u| &u.email, |u| &mut u.email);
        d.member("Active", |u| &u.active, |u| &mut u.active);
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

impl Record for Product {
    fn describe(d: &mut Describe<Self>) {
        d.member("Sku", |p| &p.sku, |p| &mut p.sku);
        d.member("Name", |p| &p.name, |p| &mut p.name);
        d.member("Price", |p| &p.price, |p| &mut p.price);
        d.member("Quantity", |p| &p.quantity, |p| &mut p.quantity);
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
struct Catalog {
    products: Vec<Product>,
}

impl Record for Catalog {
    fn describe(d: &mut Describe<Self>) {
        d.member("Products", |c| &c.products, |c| &mut c.products);
    }
}

fn user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn catalog(size: usize) -> Catalog {
    Catalog {
        products: (0..size)
            .map(|i| Product {
                sku: format!("SKU{:05}", i),
                name: format!("Product {}", i),
                price: 9.99 + i as f64,
                quantity: (i * 7 % 100) as u32,
            })
            .collect(),
    }
}

fn benchmark_write_simple(c: &mut Criterion) {
    let registry = Registry::new();
    let user = user();
    let mut group = c.benchmark_group("write_simple_record");

    for mode in [TagMode::Names, TagMode::Aliases, TagMode::Ids] {
        let options = Options::compact().with_tag_mode(mode);
        let reflective = ReflectiveCodec::<User>::new(&registry, options.clone());
        let generated = GeneratedCodec::<User>::generate(&registry, options).unwrap();

        group.bench_function(format!("reflective_{:?}", mode), |b| {
            b.iter(|| reflective.to_string(black_box(&user)))
        });
        group.bench_function(format!("generated_{:?}", mode), |b| {
            b.iter(|| generated.to_string(black_box(&user)))
        });
    }

    group.finish();
}

fn benchmark_read_simple(c: &mut Criterion) {
    let registry = Registry::new();
    let options = Options::compact();
    let reflective = ReflectiveCodec::<User>::new(&registry, options.clone());
    let generated = GeneratedCodec::<User>::generate(&registry, options).unwrap();
    let text = reflective.to_string(&user()).unwrap();

    let mut group = c.benchmark_group("read_simple_record");
    group.bench_function("reflective", |b| {
        b.iter(|| reflective.from_str(black_box(&text)))
    });
    group.bench_function("generated", |b| {
        b.iter(|| generated.from_str(black_box(&text)))
    });
    group.finish();
}

fn benchmark_catalog(c: &mut Criterion) {
    let registry = Registry::new();
    let options = Options::new();
    let mut group = c.benchmark_group("catalog");

    for size in [10, 100, 1000].iter() {
        let value = catalog(*size);
        let text = registry.to_string(&value, &options).unwrap();

        group.bench_with_input(BenchmarkId::new("write", size), &value, |b, value| {
            b.iter(|| registry.to_string(black_box(value), &options))
        });
        group.bench_with_input(BenchmarkId::new("read", size), &text, |b, text| {
            b.iter(|| registry.from_str::<Catalog>(black_box(text), &options))
        });
    }

    group.finish();
}

fn benchmark_comparison_with_serde_json(c: &mut Criterion) {
    let registry = Registry::new();
    let options = Options::compact();
    let value = catalog(100);
    let graph_text = registry.to_string(&value, &options).unwrap();
    let json_text = serde_json::to_string(&value).unwrap();

    let mut group = c.benchmark_group("comparison");

    group.bench_function("graph_write", |b| {
        b.iter(|| registry.to_string(black_box(&value), &options))
    });
    group.bench_function("json_write", |b| {
        b.iter(|| serde_json::to_string(black_box(&value)))
    });
    group.bench_function("graph_read", |b| {
        b.iter(|| registry.from_str::<Catalog>(black_box(&graph_text), &options))
    });
    group.bench_function("json_read", |b| {
        b.iter(|| serde_json::from_str::<Catalog>(black_box(&json_text)))
    });

    group.finish();
}

fn benchmark_merge(c: &mut Criterion) {
    let registry = Registry::new();
    let options = Options::compact();
    let patch = r#"{"Name":"Bob","Active":false}"#;

    c.bench_function("merge_partial_record", |b| {
        b.iter(|| {
            let mut target = user();
            registry
                .merge_from_str(black_box(patch), &mut target, &options)
                .map(|()| target)
        })
    });
}

criterion_group!(
    benches,
    benchmark_write_simple,
    benchmark_read_simple,
    benchmark_catalog,
    benchmark_comparison_with_serde_json,
    benchmark_merge
);
criterion_main!(benches);
