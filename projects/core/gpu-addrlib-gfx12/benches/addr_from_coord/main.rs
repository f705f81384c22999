use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use gpu_addrlib_gfx12::bench::compute_surface_info_unchecked;
use gpu_addrlib_gfx12::{
    AddrFromCoordInput, AddrSurface, Extent3d, Gfx12Config, Gfx12Lib, NullSink, ResourceType,
    SurfaceInfoInput, SwizzleMode,
};
use std::hint::black_box;

const WIDTH: u32 = 256;
const HEIGHT: u32 = 256;

fn criterion_benchmark(c: &mut Criterion) {
    let lib = Gfx12Lib::new(Gfx12Config::default(), Box::new(NullSink)).unwrap();
    let mut group = c.benchmark_group("Address From Coordinate");
    group.throughput(Throughput::Elements((WIDTH * HEIGHT) as u64));

    for mode in [
        SwizzleMode::Linear,
        SwizzleMode::Sw4Kb2d,
        SwizzleMode::Sw64Kb2d,
        SwizzleMode::Sw256Kb2d,
    ] {
        let surface = AddrSurface {
            swizzle_mode: mode,
            resource_type: ResourceType::Tex2d,
            bpp: 32,
            unaligned_dims: Extent3d::new(WIDTH, HEIGHT, 1),
            num_mip_levels: 1,
            num_samples: 1,
            ..Default::default()
        };

        group.bench_function(format!("{mode}_{WIDTH}x{HEIGHT}"), |b| {
            b.iter(|| {
                let mut acc = 0u64;
                for y in 0..HEIGHT {
                    for x in 0..WIDTH {
                        let input = AddrFromCoordInput {
                            surface,
                            x,
                            y,
                            ..Default::default()
                        };
                        acc ^= lib.compute_surface_addr_from_coord(&input).unwrap().addr;
                    }
                }
                black_box(acc)
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("Surface Info");
    let input = SurfaceInfoInput {
        swizzle_mode: SwizzleMode::Sw64Kb2d,
        resource_type: ResourceType::Tex2d,
        bpp: 32,
        width: 4096,
        height: 4096,
        num_slices: 6,
        num_mip_levels: 13,
        num_samples: 1,
        ..Default::default()
    };
    group.bench_function("validated_mip_chain", |b| {
        b.iter(|| black_box(lib.compute_surface_info(black_box(&input)).unwrap()))
    });
    group.bench_function("unchecked_mip_chain", |b| {
        b.iter(|| black_box(compute_surface_info_unchecked(&lib, black_box(&input)).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
