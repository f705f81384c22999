use criterion::{criterion_group, criterion_main, Criterion};
use gpu_addrlib_gfx12::equation_table::EquationTable;
use gpu_addrlib_gfx12::{Gfx12Config, Gfx12Lib, NullSink};
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Equation Table");

    group.bench_function("build_equation_table", |b| {
        b.iter(|| black_box(EquationTable::new()))
    });

    // Library construction builds both the block and equation tables.
    group.bench_function("create_library", |b| {
        b.iter(|| black_box(Gfx12Lib::new(Gfx12Config::default(), Box::new(NullSink)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
