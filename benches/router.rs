#![feature(test)]
extern crate test;

use test::Bencher;
use viaduct::{Endpoint, HttpMethod, Router};

#[bench]
fn bench_routeless_router(b: &mut Bencher) {
    let router: Router<i16> = Router::new();
    b.iter(|| router.resolve(HttpMethod::Get, "/"));
}

#[bench]
fn bench_static_routes_router(b: &mut Bencher) {
    let mut router: Router<i16> = Router::new();
    router.on("/foo/bar").get(Endpoint::zero_arg(|| 1));
    router.on("/foo/baz").get(Endpoint::zero_arg(|| 2));
    router.on("/foo/boom").get(Endpoint::zero_arg(|| 3));
    b.iter(|| router.resolve(HttpMethod::Get, "/foo/boom"));
}

#[bench]
fn bench_typed_parameter_capture(b: &mut Bencher) {
    let mut router: Router<i16> = Router::new();
    router
        .on("/api/bus/:id(integer)/device/:name(string)")
        .get(Endpoint::zero_arg(|| 1));
    b.iter(|| router.resolve(HttpMethod::Get, "/api/bus/7/device/display"));
}

#[bench]
fn bench_wildcard_route(b: &mut Bencher) {
    let mut router: Router<i16> = Router::new();
    router.on("/static/*").get(Endpoint::zero_arg(|| 1));
    b.iter(|| router.resolve(HttpMethod::Get, "/static/css/site/main.css"));
}
