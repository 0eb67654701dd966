// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! World: entity allocator, component caches and tags in one place
//!
//! Every game system takes a `&mut World`. Several worlds can coexist; none
//! of the state is global.
//!
//! Two kinds of failure:
//! - Using a component type before `register_component` panics.
//! - Stale or invalid entity handles are logged at `debug` and ignored. The
//!   `try_*` variants hand the same failure back as an [`EcsError`] instead.

#[cfg(feature = "profiling")]
use tracing::info_span;
use tracing::{debug, trace};

use crate::command::CommandBuffer;
use crate::component::{component_name, Component};
use crate::config::WorldConfig;
use crate::entity::{Entity, EntityAllocator};
use crate::error::{EcsError, Result};
use crate::query::{EachComponent, EachComponentMut, EachEntityWith, EachEntityWithTag};
use crate::registry::ComponentRegistry;
use crate::tag::{Tag, TagStore};

/// Central ECS world
pub struct World {
    entities: EntityAllocator,
    components: ComponentRegistry,
    tags: TagStore,
    config: WorldConfig,
}

impl World {
    /// Create a new, empty world with default tuning.
    pub fn new() -> Self {
        let config = WorldConfig::default();
        Self {
            entities: EntityAllocator::with_config(&config),
            components: ComponentRegistry::new(),
            tags: TagStore::new(),
            config,
        }
    }

    /// Create a world with custom tuning, rejecting invalid configs.
    pub fn with_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entities: EntityAllocator::with_config(&config),
            components: ComponentRegistry::new(),
            tags: TagStore::new(),
            config,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ========== Entities ==========

    /// Issue a new live entity.
    ///
    /// # Panics
    /// Panics if the entity index space is exhausted.
    pub fn create_entity(&mut self) -> Entity {
        self.entities.create()
    }

    /// Destroy `entity`, dropping its components and tag memberships.
    ///
    /// Removing a dead handle is a logged no-op.
    pub fn remove_entity(&mut self, entity: Entity) {
        if let Err(err) = self.try_remove_entity(entity) {
            debug!(%entity, %err, "remove_entity ignored");
        }
    }

    pub fn try_remove_entity(&mut self, entity: Entity) -> Result<()> {
        #[cfg(feature = "profiling")]
        let span = info_span!("world.remove_entity", entity = %entity);
        #[cfg(feature = "profiling")]
        let _span_guard = span.enter();

        self.check_alive(entity)?;
        self.entities.remove(entity);

        let purged = self.components.remove_all(entity);
        let untagged = self.tags.remove_all(entity);
        trace!(%entity, components = ?purged, tags = untagged, "entity removed");
        Ok(())
    }

    /// Check if an entity handle is live
    #[inline]
    pub fn alive(&self, entity: Entity) -> bool {
        self.entities.alive(entity)
    }

    fn check_alive(&self, entity: Entity) -> Result<()> {
        if !entity.is_valid() {
            Err(EcsError::InvalidEntity)
        } else if !self.entities.alive(entity) {
            Err(EcsError::EntityNotFound(entity))
        } else {
            Ok(())
        }
    }

    // ========== Components ==========

    /// Create the cache for `T`. Must happen before any other use of `T`.
    pub fn register_component<T: Component>(&mut self) {
        self.components.register::<T>();
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.components.is_registered::<T>()
    }

    /// Attach a default `T` to `entity`, or return the one it already has.
    ///
    /// Returns `None` (logged) if the entity is not alive.
    ///
    /// # Panics
    /// Panics if `T` is not registered.
    pub fn add_component<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        match self.try_add_component::<T>(entity) {
            Ok(component) => Some(component),
            Err(err) => {
                debug!(%entity, %err, "add_component ignored");
                None
            }
        }
    }

    pub fn try_add_component<T: Component>(&mut self, entity: Entity) -> Result<&mut T> {
        let cache = self.components.cache_mut::<T>();
        if !entity.is_valid() {
            return Err(EcsError::InvalidEntity);
        }
        if !self.entities.alive(entity) {
            return Err(EcsError::EntityNotFound(entity));
        }
        if cache.contains(entity) {
            debug!(%entity, component = component_name::<T>(), "component already attached");
        }
        Ok(cache.insert_default(entity))
    }

    /// Attach `value` to `entity`, overwriting any existing `T`.
    ///
    /// # Panics
    /// Panics if `T` is not registered.
    pub fn insert_component<T: Component>(&mut self, entity: Entity, value: T) -> Option<&mut T> {
        match self.try_add_component::<T>(entity) {
            Ok(slot) => {
                *slot = value;
                Some(slot)
            }
            Err(err) => {
                debug!(%entity, %err, "insert_component ignored");
                None
            }
        }
    }

    /// # Panics
    /// Panics if `T` is not registered.
    pub fn get_component<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let cache = self.components.cache_mut::<T>();
        if !self.entities.alive(entity) {
            return None;
        }
        cache.get_mut(entity)
    }

    /// # Panics
    /// Panics if `T` is not registered.
    pub fn get_component_ref<T: Component>(&self, entity: Entity) -> Option<&T> {
        let cache = self.components.cache::<T>();
        if !self.entities.alive(entity) {
            return None;
        }
        cache.get(entity)
    }

    /// Look up `entity`'s `T` without panicking on an unregistered type.
    pub fn try_get_component_ref<T: Component>(&self, entity: Entity) -> Result<&T> {
        let cache = self
            .components
            .try_cache::<T>()
            .ok_or(EcsError::ComponentNotRegistered(component_name::<T>()))?;
        self.check_alive(entity)?;
        cache.get(entity).ok_or(EcsError::ComponentNotFound {
            entity,
            component: component_name::<T>(),
        })
    }

    /// Detach `T` from `entity`. Missing components are a logged no-op.
    ///
    /// # Panics
    /// Panics if `T` is not registered.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) {
        if let Err(err) = self.try_remove_component::<T>(entity) {
            debug!(%entity, %err, "remove_component ignored");
        }
    }

    /// Detach and return `entity`'s `T`.
    pub fn try_remove_component<T: Component>(&mut self, entity: Entity) -> Result<T> {
        let cache = self.components.cache_mut::<T>();
        cache.remove(entity).ok_or(EcsError::ComponentNotFound {
            entity,
            component: component_name::<T>(),
        })
    }

    /// # Panics
    /// Panics if `T` is not registered.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components.cache::<T>().contains(entity)
    }

    // ========== Tags ==========

    pub fn register_tag(&mut self) -> Tag {
        self.tags.register()
    }

    /// Tag a live entity. Dead handles and unregistered tags are logged no-ops.
    pub fn add_tag(&mut self, entity: Entity, tag: Tag) {
        if let Err(err) = self.try_add_tag(entity, tag) {
            debug!(%entity, %err, "add_tag ignored");
        }
    }

    /// Returns whether `entity` was newly added to `tag`.
    pub fn try_add_tag(&mut self, entity: Entity, tag: Tag) -> Result<bool> {
        self.check_alive(entity)?;
        if !self.tags.is_registered(tag) {
            return Err(EcsError::TagNotRegistered(tag));
        }
        Ok(self.tags.add(entity, tag))
    }

    pub fn remove_tag(&mut self, entity: Entity, tag: Tag) {
        self.tags.remove(entity, tag);
    }

    pub fn has_tag(&self, entity: Entity, tag: Tag) -> bool {
        self.tags.has(entity, tag)
    }

    // ========== Queries ==========

    /// Walk every `T` with its owner, mutably.
    ///
    /// # Panics
    /// Panics if `T` is not registered.
    pub fn each_component<T: Component>(&mut self) -> EachComponentMut<'_, T> {
        EachComponentMut::new(self.components.cache_mut::<T>())
    }

    /// # Panics
    /// Panics if `T` is not registered.
    pub fn each_component_ref<T: Component>(&self) -> EachComponent<'_, T> {
        EachComponent::new(self.components.cache::<T>())
    }

    /// # Panics
    /// Panics if `T` is not registered.
    pub fn each_entity_with<T: Component>(&self) -> EachEntityWith<'_> {
        EachEntityWith::new(self.components.cache::<T>())
    }

    pub fn each_entity_with_tag(&self, tag: Tag) -> EachEntityWithTag<'_> {
        self.tags.members(tag)
    }

    /// Snapshot of the owners of `T`, safe to hold across mutations
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.components.cache::<T>().entities().to_vec()
    }

    /// Snapshot of `tag`'s members, safe to hold across mutations
    pub fn entities_with_tag(&self, tag: Tag) -> Vec<Entity> {
        self.tags.members(tag).collect()
    }

    /// Replay commands recorded while the world was borrowed
    pub fn apply_commands(&mut self, buffer: &mut CommandBuffer) {
        #[cfg(feature = "profiling")]
        let span = info_span!("world.apply_commands", queued = buffer.len());
        #[cfg(feature = "profiling")]
        let _span_guard = span.enter();

        buffer.apply(self);
    }

    // ========== Diagnostics ==========

    pub fn entity_count(&self) -> usize {
        self.entities.live_count()
    }

    /// # Panics
    /// Panics if `T` is not registered.
    pub fn component_count<T: Component>(&self) -> usize {
        self.components.cache::<T>().len()
    }

    pub fn tag_count(&self, tag: Tag) -> usize {
        self.tags.count(tag)
    }

    pub fn recycled_entity_count(&self) -> usize {
        self.entities.recycled_count()
    }

    pub fn allocator(&self) -> &EntityAllocator {
        &self.entities
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn tag_store(&self) -> &TagStore {
        &self.tags
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            live_entities: self.entities.live_count(),
            allocated_slots: self.entities.slot_count(),
            free_indices: self.entities.free_count(),
            recycled_entities: self.entities.recycled_count(),
            generation_wraps: self.entities.generation_wraps(),
            component_types: self.components.len(),
            tags: self.tags.len(),
        }
    }

    /// Destroy every live entity. Registrations survive.
    pub fn clear(&mut self) {
        let live: Vec<Entity> = self.entities.iter_alive().collect();
        for entity in live {
            self.remove_entity(entity);
        }
        debug_assert!(self.components.caches().all(|cache| cache.is_empty()));
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Allocation counters for a world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldStats {
    pub live_entities: usize,
    pub allocated_slots: usize,
    pub free_indices: usize,
    pub recycled_entities: usize,
    pub generation_wraps: usize,
    pub component_types: usize,
    pub tags: usize,
}
