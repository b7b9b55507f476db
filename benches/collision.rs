#![allow(missing_docs)]
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tile_physics::{
    world::Cell, Aabb, CollisionChecker, CollisionData, CollisionFlags, FixedSingle, LanderCollisionChecker,
    SweepMode, TileMap, TracerCollisionChecker, Vector,
};

/// Square map with a solid border and a floor on the second to last row.
fn arena(cells: usize) -> TileMap {
    let mut map = TileMap::new(cells, cells).expect("non-empty map");
    let last = cells as i32 - 1;
    for i in 0..=last {
        map.set_collision_data(Cell::new(0, i), CollisionData::SOLID);
        map.set_collision_data(Cell::new(last, i), CollisionData::SOLID);
        map.set_collision_data(Cell::new(i, 0), CollisionData::SOLID);
        map.set_collision_data(Cell::new(i, last), CollisionData::SOLID);
    }
    map
}

fn probe() -> Aabb {
    Aabb::from_size(Vector::from_ints(24, 24), FixedSingle::from_int(14), FixedSingle::from_int(30))
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracer_sweep");
    for &cells in &[16usize, 64, 256] {
        let map = arena(cells);
        let distance = FixedSingle::from_int(cells as i32 * 16);
        group.throughput(Throughput::Elements(cells as u64));
        for mode in [SweepMode::Coarse, SweepMode::Fine] {
            group.bench_with_input(BenchmarkId::new(format!("{mode:?}"), cells), &cells, |b, _| {
                let mut tracer = TracerCollisionChecker::default();
                b.iter(|| {
                    tracer.setup_box(probe(), CollisionFlags::NONE, true, false, false);
                    let flags = tracer.move_contact_solid(&map, Vector::new(distance, FixedSingle::ZERO), distance, mode);
                    black_box(flags)
                })
            });
        }
    }
    group.finish();
}

fn bench_landed_state(c: &mut Criterion) {
    let map = arena(16);
    let mut lander = LanderCollisionChecker::default();
    let standing = Aabb::from_size(Vector::from_ints(40, 210), FixedSingle::from_int(14), FixedSingle::from_int(30));

    c.bench_function("landed_state", |b| {
        b.iter(|| {
            lander.setup_box(standing, CollisionFlags::NONE, true, false, true);
            black_box(lander.compute_landed_state(&map))
        })
    });
}

criterion_group!(benches, bench_sweep, bench_landed_state);
criterion_main!(benches);
