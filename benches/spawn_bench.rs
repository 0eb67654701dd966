use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rogue_ecs::World;

#[derive(Debug, Default, Clone)]
#[allow(dead_code)]
struct Position(i32, i32);

#[derive(Debug, Default, Clone)]
#[allow(dead_code)]
struct Health(u32);

fn create_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    group.bench_function("create_entity_10k", |b| {
        b.iter_batched(
            World::new,
            |mut world| {
                for _ in 0..10_000 {
                    world.create_entity();
                }
                world
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("create_with_2_components_10k", |b| {
        b.iter_batched(
            || {
                let mut world = World::new();
                world.register_component::<Position>();
                world.register_component::<Health>();
                world
            },
            |mut world| {
                for i in 0..10_000 {
                    let e = world.create_entity();
                    world.insert_component(e, Position(i, i));
                    world.insert_component(e, Health(100));
                }
                world
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn churn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    // Steady state create/destroy exercises the recycling path
    group.bench_function("create_destroy_cycle_10k", |b| {
        b.iter_batched(
            || {
                let mut world = World::new();
                world.register_component::<Health>();
                world
            },
            |mut world| {
                let mut live = Vec::with_capacity(64);
                for i in 0..10_000u32 {
                    let e = world.create_entity();
                    world.insert_component(e, Health(i));
                    live.push(e);
                    if live.len() == 64 {
                        for e in live.drain(..) {
                            world.remove_entity(e);
                        }
                    }
                }
                world
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, create_benchmark, churn_benchmark);
criterion_main!(benches);
