use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use sheet_analyzer::{AnalysisProfile, AnalysisReport, Dataset, Value, frequency, group_stats, trend};

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const ROWS: usize = 1_000_000;

fn synthetic_dataset(rows: usize) -> Dataset {
    let sites = ["Norte", "Sur", "Este", "Oeste", "Centro", "Costa"];
    let mut rng = rand::rng();

    let data = (0..rows)
        .map(|_| {
            let depth = if rng.random_bool(0.02) {
                None
            } else {
                Some(Value::Float(rng.random_range(0.5..40.0)))
            };
            vec![
                Some(Value::from(sites[rng.random_range(0..sites.len())])),
                depth,
                Some(Value::Int(rng.random_range(2015..=2024))),
            ]
        })
        .collect();

    Dataset::from_rows(
        vec![
            "Localización".to_string(),
            "Profundidad (m)".to_string(),
            "Año de Monitoreo".to_string(),
        ],
        data,
    )
}

fn aggregations(c: &mut Criterion) {
    let mut group = c.benchmark_group("Aggregation");
    group.sample_size(10);

    let dataset = synthetic_dataset(ROWS);
    group.throughput(Throughput::Elements(ROWS as u64));

    group.bench_function("frequency", |b| {
        b.iter(|| frequency(&dataset, "Localización").unwrap());
    });

    group.bench_function("group_stats", |b| {
        b.iter(|| group_stats(&dataset, "Localización", "Profundidad (m)").unwrap());
    });

    group.bench_function("trend", |b| {
        b.iter(|| {
            trend(
                &dataset,
                "Año de Monitoreo",
                "Localización",
                "Profundidad (m)",
            )
            .unwrap()
        });
    });

    group.bench_function("full_report", |b| {
        let profile = AnalysisProfile::environmental();
        b.iter(|| AnalysisReport::compute(&dataset, "Localización", &profile).unwrap());
    });

    group.finish();
}

criterion_group!(benches, aggregations);
criterion_main!(benches);
