use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use tui_mosaic::data::builtin_world;
use tui_mosaic::map::MapProjection;
use tui_mosaic::mosaic::{generate, GenConfig};

/// Land classification over the full 3° lattice — the hot inner test of
/// the generation pass.
fn bench_containment(c: &mut Criterion) {
    let land = builtin_world();
    c.bench_function("land_containment_sweep_3deg", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            let mut lat = 85.0;
            while lat >= -85.0 {
                let mut lon = -180.0;
                while lon <= 180.0 {
                    if land.contains(black_box(lon), black_box(lat)) {
                        hits += 1;
                    }
                    lon += 3.0;
                }
                lat -= 3.0;
            }
            hits
        })
    });
}

/// A full generation pass at the default resolution.
fn bench_generate(c: &mut Criterion) {
    let land = builtin_world();
    let proj = MapProjection::fit(1200, 680, 20.0);
    c.bench_function("generate_3deg", |b| {
        b.iter(|| generate(&GenConfig::with_seed(7), black_box(&land), None, &proj))
    });
}

criterion_group!(benches, bench_containment, bench_generate);
criterion_main!(benches);
