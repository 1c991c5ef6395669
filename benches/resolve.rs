use criterion::{criterion_group, criterion_main, Criterion};
use globrouter::app::build_router;
use globrouter::config::{load_config_str, ConfigFormat};
use globrouter::dispatcher::{Context, HandlerRegistry};
use globrouter::router::Router;
use std::hint::black_box;

fn zoo_config() -> &'static str {
    r"
name: zoo
routers:
  - { path: /, handler: root, methods: [GET] }
  - { path: /zoo/animals, handler: animals, methods: [GET, POST] }
  - { path: '/zoo/animals/{id}', handler: animal, methods: [GET, PUT, PATCH, DELETE] }
  - { path: '/zoo/animals/{id}/toys/{toy_id}', handler: animal_toy, methods: [GET] }
  - { path: '/zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}', handler: habitat_section, methods: [GET] }
  - { path: '/inventory/{warehouse_id}/feeds/{feed_id}/items/{item_id}/batches/{batch_id}', handler: item_batch, methods: [POST] }
  - { path: /static/**, handler: assets, methods: [GET] }
  - { path: /reports/**/summary, handler: summary, methods: [GET] }
  - { path: /exports/*.csv, handler: csv, methods: [GET] }
  - { path: /*, handler: fallback }
"
}

fn noop(_ctx: &mut Context<'_>) -> anyhow::Result<()> {
    Ok(())
}

fn zoo_router() -> Router {
    let config = load_config_str(zoo_config(), ConfigFormat::Yaml).expect("valid bench config");
    let mut registry = HandlerRegistry::new();
    for name in config.handler_names() {
        registry.register(name, noop);
    }
    build_router(&config, &registry).expect("bench router")
}

fn bench_resolve(c: &mut Criterion) {
    let router = zoo_router();
    c.bench_function("resolve_match", |b| {
        let requests = [
            ("GET", "/zoo/animals/123"),
            ("GET", "/zoo/animals/123/toys/456"),
            ("GET", "/zoo/cats/animals/123/habitats/88/sections/5"),
            ("POST", "/inventory/1/feeds/2/items/3/batches/4"),
            ("GET", "/static/css/site/main.css"),
            ("GET", "/reports/2024/q1/summary"),
            ("GET", "/exports/all.csv"),
        ];
        b.iter(|| {
            for (method, path) in &requests {
                black_box(router.resolve_match(method, path).ok());
            }
        })
    });

    c.bench_function("resolve_miss", |b| {
        b.iter(|| black_box(router.resolve_match("DELETE", "/zoo/animals").err()))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
