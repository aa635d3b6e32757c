use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use listset::{PolicyKind, WorkloadConfig, WorkloadDriver};

const OPS: usize = 20_000;
const PRELOAD: usize = 1_000;

fn driver(policy: PolicyKind, threads: usize, search: f64, insert: f64) -> WorkloadDriver {
    WorkloadDriver::new(WorkloadConfig {
        policy,
        thread_count: threads,
        initial_insert_count: PRELOAD,
        total_ops: OPS,
        search_percent: search,
        insert_percent: insert,
    })
    .unwrap()
}

fn bench_mix(c: &mut Criterion, group_name: &str, search: f64, insert: f64) {
    let mut group = c.benchmark_group(group_name);
    group.sample_size(10);

    for threads in [1, 2, 4, 8] {
        group.throughput(Throughput::Elements((OPS / threads * threads) as u64));
        for policy in PolicyKind::ALL {
            let driver = driver(policy, threads, search, insert);
            group.bench_with_input(
                BenchmarkId::new(policy.name(), threads),
                &driver,
                |b, driver| b.iter(|| black_box(driver.run_configured().unwrap())),
            );
        }
    }
    group.finish();
}

fn read_mostly(c: &mut Criterion) {
    bench_mix(c, "read_mostly_99_0.5_0.5", 0.99, 0.005);
}

fn mixed(c: &mut Criterion) {
    bench_mix(c, "mixed_80_10_10", 0.8, 0.1);
}

fn write_heavy(c: &mut Criterion) {
    bench_mix(c, "write_heavy_20_40_40", 0.2, 0.4);
}

criterion_group!(benches, read_mostly, mixed, write_heavy);
criterion_main!(benches);
