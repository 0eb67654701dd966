use crate::entity::Entity;
use crate::tag::Tag;
use crate::world::World;

/// World inspector for debugging
pub struct WorldInspector;

impl WorldInspector {
    /// Get live entity count
    pub fn entity_count(world: &World) -> usize {
        world.entity_count()
    }

    /// One entry per registered component cache
    pub fn cache_summary(world: &World) -> Vec<CacheInfo> {
        world
            .registry()
            .caches()
            .map(|cache| CacheInfo {
                component: cache.component_name(),
                len: cache.len(),
                consistent: cache.is_consistent(),
            })
            .collect()
    }

    /// One entry per registered tag
    pub fn tag_summary(world: &World) -> Vec<TagInfo> {
        let tags = world.tag_store();
        tags.tags()
            .map(|tag| TagInfo {
                tag,
                members: tags.count(tag),
            })
            .collect()
    }

    /// Names of the components `entity` currently owns
    pub fn components_of(world: &World, entity: Entity) -> Vec<&'static str> {
        world
            .registry()
            .caches()
            .filter(|cache| cache.contains_entity(entity))
            .map(|cache| cache.component_name())
            .collect()
    }

    /// Every index/back-reference mismatch and every component or tag held by
    /// a dead entity. Empty when the world is sound.
    pub fn integrity_problems(world: &World) -> Vec<String> {
        let mut problems = Vec::new();

        for cache in world.registry().caches() {
            if !cache.is_consistent() {
                problems.push(format!("{}: index out of sync", cache.component_name()));
            }
            for &owner in cache.owners() {
                if !world.alive(owner) {
                    problems.push(format!(
                        "{}: held by dead entity {owner}",
                        cache.component_name()
                    ));
                }
            }
        }

        for tag in world.tag_store().tags() {
            for member in world.each_entity_with_tag(tag) {
                if !world.alive(member) {
                    problems.push(format!("tag {}: held by dead entity {member}", tag.id()));
                }
            }
        }

        problems
    }

    /// Print world summary to console
    pub fn print_summary(world: &World) {
        let stats = world.stats();
        println!("=== World Summary ===");
        println!("Entities: {}", stats.live_entities);
        println!("Slots: {} ({} free)", stats.allocated_slots, stats.free_indices);
        println!("Recycled: {}", stats.recycled_entities);

        println!("\n=== Components ===");
        for info in Self::cache_summary(world) {
            println!("{}: {} components", info.component, info.len);
        }

        println!("\n=== Tags ===");
        for info in Self::tag_summary(world) {
            println!("Tag {}: {} members", info.tag.id(), info.members);
        }
    }

    /// Print entity details
    pub fn print_entity(world: &World, entity: Entity) {
        if world.alive(entity) {
            println!("=== Entity {entity:?} ===");
            println!("Components: {:?}", Self::components_of(world, entity));
        } else {
            println!("Entity {entity:?} not found");
        }
    }
}

/// Cache information for debugging
#[derive(Clone, Debug)]
pub struct CacheInfo {
    pub component: &'static str,
    pub len: usize,
    pub consistent: bool,
}

/// Tag information for debugging
#[derive(Clone, Debug)]
pub struct TagInfo {
    pub tag: Tag,
    pub members: usize,
}
