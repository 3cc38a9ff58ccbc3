use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::time::Duration;
use zhtw::Converter;

fn bench_convert_100k(c: &mut Criterion) {
    let input = "这个软件的用户在面试之后发送了复杂的测试数据，".repeat(4348); // ~100,004 characters
    let zhtw = Converter::builtin().unwrap();

    c.bench_function("convert_100k", |b| {
        b.iter(|| zhtw.convert(black_box(&input)));
    });
}

fn bench_check_100k(c: &mut Criterion) {
    let input = "第一行没有术语，皇后与茶几保持不变。\n软件和数据库都要转换。\n".repeat(3226); // ~100,006 characters
    let zhtw = Converter::builtin().unwrap();

    c.bench_function("check_100k", |b| {
        b.iter(|| zhtw.check(black_box(&input)).len());
    });
}

fn bench_no_match_100k(c: &mut Criterion) {
    let input = "已經是臺灣用語的文字內容，".repeat(7693); // ~100,009 characters
    let zhtw = Converter::builtin().unwrap();

    c.bench_function("no_match_100k", |b| {
        b.iter(|| zhtw.has_matches(black_box(&input)));
    });
}

fn bench_build_builtin(c: &mut Criterion) {
    c.bench_function("build_builtin", |b| {
        b.iter(|| Converter::builtin().unwrap());
    });
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(5))
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_convert_100k, bench_check_100k, bench_no_match_100k, bench_build_builtin
}
criterion_main!(benches);
