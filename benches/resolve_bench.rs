// benches/resolve_bench.rs
//! Cost of resolving the spoof target on every intercepted call

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geomock_engine::interception::{HookValue, InterceptionEngine, LoadPackageParam, SimulatedRuntime, Surface};
use geomock_engine::state::{FileConfigStore, MemoryConfigStore, MockStateResolver};
use geomock_engine::utils::config::EngineConfig;
use std::sync::Arc;

const RECORD: &str = r#"{"name":"bench","lat":52.52,"lng":13.405,"timestamp":1700000000000,"wifiBssids":["aa:bb:cc:dd:ee:01","aa:bb:cc:dd:ee:02","aa:bb:cc:dd:ee:03"],"cellInfo":{"networkType":"GSM","mcc":262,"mnc":1,"lac":100,"cid":200}}"#;

fn bench_resolve(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mock_location.loc");
    std::fs::write(&path, RECORD).unwrap();

    let file_resolver = MockStateResolver::new(Arc::new(FileConfigStore::at(&path)));
    c.bench_function("resolve_from_file", |b| {
        b.iter(|| black_box(file_resolver.resolve()))
    });

    let missing = MockStateResolver::new(Arc::new(FileConfigStore::at(dir.path().join("absent"))));
    c.bench_function("resolve_missing_file", |b| b.iter(|| black_box(missing.resolve())));

    let memory = MemoryConfigStore::new();
    memory.publish_raw(RECORD);
    let memory_resolver = MockStateResolver::new(Arc::new(memory));
    c.bench_function("resolve_from_memory", |b| {
        b.iter(|| black_box(memory_resolver.resolve()))
    });
}

fn bench_hooked_call(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = EngineConfig::default();
    config.store.path = dir.path().join("mock_location.loc");
    std::fs::write(&config.store.path, RECORD).unwrap();

    let engine = InterceptionEngine::from_config(&config);
    let runtime = SimulatedRuntime::new(34);
    engine.on_package_loaded(&LoadPackageParam::new("com.example.bench", &runtime));

    let latitude = Surface::Latitude.target();
    c.bench_function("hooked_get_latitude", |b| {
        b.iter(|| black_box(runtime.invoke(&latitude, HookValue::Double(0.0))))
    });

    let scan = Surface::WifiScanResults.target();
    c.bench_function("hooked_get_scan_results", |b| {
        b.iter(|| black_box(runtime.invoke(&scan, HookValue::Null)))
    });
}

criterion_group!(benches, bench_resolve, bench_hooked_call);
criterion_main!(benches);
