use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rogue_ecs::prelude::*;

fn alive_count(world: &World, handles: &[Entity]) -> usize {
    handles.iter().filter(|&&e| world.alive(e)).count()
}

#[test]
fn test_bulk_lifecycle() {
    let mut world = World::new();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let mut first: Vec<Entity> = (0..1000).map(|_| world.create_entity()).collect();
    assert_eq!(alive_count(&world, &first), 1000);
    assert_eq!(world.entity_count(), 1000);

    first.shuffle(&mut rng);
    let (removed, kept) = first.split_at(400);
    for &e in removed {
        world.remove_entity(e);
    }

    assert_eq!(world.entity_count(), 600);
    assert!(removed.iter().all(|&e| !world.alive(e)));
    assert!(kept.iter().all(|&e| world.alive(e)));

    let second: Vec<Entity> = (0..1000).map(|_| world.create_entity()).collect();
    assert_eq!(world.entity_count(), 1600);
    assert!(second.iter().all(|&e| world.alive(e)));
    // Recycled slots never resurrect the removed handles
    assert!(removed.iter().all(|&e| !world.alive(e)));
    assert!(kept.iter().all(|&e| world.alive(e)));
}

#[test]
fn test_removal_does_not_disturb_others() {
    let mut world = World::new();
    let handles: Vec<Entity> = (0..100).map(|_| world.create_entity()).collect();

    for (i, &victim) in handles.iter().enumerate().step_by(7) {
        world.remove_entity(victim);
        assert!(!world.alive(victim));
        for (j, &other) in handles.iter().enumerate() {
            let expected = j % 7 != 0 || j > i;
            assert_eq!(world.alive(other), expected, "entity {j} after removing {i}");
        }
    }
}

#[test]
fn test_generation_distinctness() {
    let mut world = World::with_config(WorldConfig {
        reuse_threshold: 1,
        ..WorldConfig::default()
    })
    .unwrap();

    let e1 = world.create_entity();
    world.remove_entity(e1);
    let e2 = world.create_entity();

    assert_eq!(e1.index(), e2.index());
    assert_ne!(e1, e2);
    assert!(!world.alive(e1));
    assert!(world.alive(e2));
}

#[test]
fn test_tight_churn_batches_reuse() {
    let mut world = World::new();
    let threshold = world.config().reuse_threshold;

    // Create/destroy one at a time: never enough freed indices to recycle
    for _ in 0..threshold - 1 {
        let e = world.create_entity();
        world.remove_entity(e);
    }
    assert_eq!(world.recycled_entity_count(), 0);
    assert_eq!(world.stats().allocated_slots, threshold - 1);
}

#[test]
fn test_invalid_handle_is_never_alive() {
    let mut world = World::new();
    for _ in 0..10 {
        world.create_entity();
    }
    assert!(!world.alive(Entity::INVALID));
    world.remove_entity(Entity::INVALID);
    assert_eq!(world.entity_count(), 10);
}

#[test]
fn test_config_from_json() {
    let config = WorldConfig::from_json_str(r#"{ "reuse_threshold": 2, "free_queue_capacity": 1 }"#)
        .expect("valid config");
    let mut world = World::with_config(config).unwrap();

    let a = world.create_entity();
    let b = world.create_entity();
    world.remove_entity(a);
    world.remove_entity(b);
    // Queue grew past its initial capacity of one
    assert_eq!(world.stats().free_indices, 2);

    let c = world.create_entity();
    assert_eq!(c.index(), a.index());
    assert_eq!(c.generation(), 1);
}
