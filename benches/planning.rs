use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use multiraxml::io::descriptor::render_descriptor;
use multiraxml::{chunk_replicates, Allocation, Dataset, DescriptorBuilder, PlanPolicy, RunLayout};
use std::hint::black_box;

/// Benchmark replicate chunking for growing replicate counts
fn bench_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_replicates");
    let policy = PlanPolicy::default();

    for replicates in [10u32, 100, 1000, 10_000] {
        group.throughput(Throughput::Elements(replicates as u64));
        group.bench_with_input(
            BenchmarkId::new("replicates", replicates),
            &replicates,
            |b, &replicates| b.iter(|| chunk_replicates(black_box(replicates), &policy)),
        );
    }
    group.finish();
}

/// Benchmark planning and rendering a phase-2 descriptor for many datasets
fn bench_inference_descriptor(c: &mut Criterion) {
    let mut group = c.benchmark_group("inference_descriptor");
    let layout = RunLayout::new("/scratch/out");
    let options: Vec<String> = ["--model", "GTR+G", "--blopt", "nr_safe"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let builder = DescriptorBuilder::new(&layout, &options, PlanPolicy::default(), 100);
    let alloc = Allocation { cores: 4, taxa: 120 };

    for n_datasets in [10usize, 100, 1000] {
        let datasets: Vec<Dataset> = (0..n_datasets)
            .map(|i| Dataset::from_path(format!("/data/msa/gene_{}.fasta", i)).unwrap())
            .collect();

        group.throughput(Throughput::Elements(n_datasets as u64));
        group.bench_with_input(
            BenchmarkId::new("datasets", n_datasets),
            &datasets,
            |b, datasets| {
                b.iter(|| {
                    let mut units = Vec::new();
                    for ds in datasets {
                        units.push(builder.inference_unit(ds, alloc));
                        units.extend(builder.replicate_units(ds, alloc));
                    }
                    render_descriptor(black_box(&units)).unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_chunking, bench_inference_descriptor);
criterion_main!(benches);
