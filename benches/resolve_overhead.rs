//! Benchmarks for route resolution.
//!
//! Each resolution tier is measured on its own (exact lookup, regex
//! candidates, tree walk), plus the full path through the axum fallback.

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use route_conf::{
    Config, Resolution, RouteEngine, RouteEntry, RouteTree, compile, route_service,
};
use std::{hint::black_box, sync::Arc};
use tower::ServiceExt;

/// Engine with discovered routes for `handlers` handlers and a handful of
/// parameterized overrides.
fn test_engine(handlers: usize) -> RouteEngine {
    let mut config = Config::from_toml("").expect("empty config parses");
    for i in 0..handlers {
        config = config.with_handler(&format!("Handler{i}Controller"), ["index", "show", "edit"]);
    }
    let config = config
        .with_route("/items/<id>", "Items", "show")
        .with_route("/users/<user>/posts/<post>", "Posts", "show");
    RouteEngine::from_config(&config)
}

fn test_tree() -> RouteTree {
    let mut tree = RouteTree::new();
    for (pattern, action) in [
        ("/users/<user>", "show"),
        ("/users/<user>/posts", "index"),
        ("/users/<user>/posts/<post>", "show"),
        ("/users/<user>/posts/<post>/comments", "index"),
    ] {
        tree.insert(RouteEntry::new(compile(pattern).unwrap(), "Posts", action))
            .unwrap();
    }
    tree
}

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact");
    for handlers in [10, 100, 1000] {
        let engine = test_engine(handlers);
        let route = format!("/handler{}/show", handlers / 2);
        engine.snapshot();
        group.bench_with_input(BenchmarkId::from_parameter(handlers), &route, |b, route| {
            b.iter(|| black_box(engine.resolve(black_box(route)).unwrap()))
        });
    }
    group.finish();
}

fn bench_regex(c: &mut Criterion) {
    let engine = test_engine(100);
    engine.snapshot();
    c.bench_function("regex_two_params", |b| {
        b.iter(|| black_box(engine.resolve(black_box("/users/7/posts/hello")).unwrap()))
    });
}

fn bench_tree(c: &mut Criterion) {
    let tree = test_tree();
    let segments = ["users", "7", "posts", "hello"];
    c.bench_function("tree_two_params", |b| {
        b.iter(|| black_box(tree.find(black_box(&segments))))
    });
}

fn bench_not_found(c: &mut Criterion) {
    let engine = test_engine(100);
    engine.snapshot();
    c.bench_function("not_found", |b| {
        b.iter(|| black_box(engine.resolve(black_box("/does/not/exist")).unwrap()))
    });
}

async fn render(resolution: Resolution) -> Response {
    resolution.action.into_response()
}

fn bench_fallback_service(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = route_service(Arc::new(test_engine(100)), render);

    c.bench_function("fallback_service", |b| {
        b.to_async(&rt).iter(|| async {
            let request = Request::get("/items/42?tab=1").body(Body::empty()).unwrap();
            black_box(router.clone().oneshot(request).await.unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_exact,
    bench_regex,
    bench_tree,
    bench_not_found,
    bench_fallback_service
);
criterion_main!(benches);
