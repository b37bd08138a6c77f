use criterion::Throughput;
use criterion::{criterion_group, criterion_main, Criterion};
use logpack::{Config, Value};

fn encode(c: &mut Criterion) {
    let config = Config::default();

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("literal", |b| {
        b.iter(|| config.encode("connection established", &[], 0))
    });

    let args: Vec<Value> = vec![42.into()];
    group.bench_function("int", |b| {
        b.iter(|| config.encode("request failed with code %d", &args, 0))
    });

    let args: Vec<Value> = vec!["alice".into(), 42.into(), 0.125.into()];
    group.bench_function("mixed", |b| {
        b.iter(|| config.encode("user %{private}@ code %d latency %.3f", &args, 0))
    });

    let mut buffer = [0u8; 128];
    group.bench_function("mixed/stack", |b| {
        b.iter(|| {
            config.encode_with_buffer(
                &mut buffer,
                "user %{private}@ code %d latency %.3f",
                &args,
                0,
            )
        })
    });

    let args: Vec<Value> = (0..48).map(Value::from).collect();
    let format = "%d ".repeat(48);
    group.bench_function("max_commands", |b| {
        b.iter(|| config.encode(&format, &args, 0))
    });

    group.finish();
}

criterion_group!(benches, encode);
criterion_main!(benches);
