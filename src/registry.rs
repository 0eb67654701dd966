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

//! Component type registry
//!
//! Maps each registered component type to its own [`ComponentCache`]. Typed
//! access goes through a `TypeId` lookup and a downcast; destroying an entity
//! walks every cache through the [`ErasedCache`] interface.

use std::any::TypeId;

use ahash::AHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::component::{component_name, Component};
use crate::entity::Entity;
use crate::storage::{ComponentCache, ErasedCache};

/// Names of the caches an entity was purged from
pub type PurgedComponents = SmallVec<[&'static str; 8]>;

/// Owns one cache per registered component type
#[derive(Default)]
pub struct ComponentRegistry {
    caches: Vec<Box<dyn ErasedCache>>,
    cache_index: AHashMap<TypeId, usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the cache for `T`. Registering the same type twice keeps the
    /// existing cache.
    pub fn register<T: Component>(&mut self) {
        let type_id = TypeId::of::<T>();
        if self.cache_index.contains_key(&type_id) {
            debug!(
                component = component_name::<T>(),
                "component already registered"
            );
            return;
        }
        let idx = self.caches.len();
        self.caches.push(Box::new(ComponentCache::<T>::new()));
        self.cache_index.insert(type_id, idx);
        debug!(component = component_name::<T>(), idx, "registered component");
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.cache_index.contains_key(&TypeId::of::<T>())
    }

    /// Typed cache for `T`.
    ///
    /// # Panics
    /// Panics if `T` was never registered.
    pub fn cache<T: Component>(&self) -> &ComponentCache<T> {
        self.try_cache::<T>()
            .unwrap_or_else(|| unregistered::<T>())
    }

    /// Mutable typed cache for `T`.
    ///
    /// # Panics
    /// Panics if `T` was never registered.
    pub fn cache_mut<T: Component>(&mut self) -> &mut ComponentCache<T> {
        self.try_cache_mut::<T>()
            .unwrap_or_else(|| unregistered::<T>())
    }

    pub fn try_cache<T: Component>(&self) -> Option<&ComponentCache<T>> {
        let idx = *self.cache_index.get(&TypeId::of::<T>())?;
        self.caches[idx]
            .as_any()
            .downcast_ref::<ComponentCache<T>>()
    }

    pub fn try_cache_mut<T: Component>(&mut self) -> Option<&mut ComponentCache<T>> {
        let idx = *self.cache_index.get(&TypeId::of::<T>())?;
        self.caches[idx]
            .as_any_mut()
            .downcast_mut::<ComponentCache<T>>()
    }

    /// Remove `entity` from every cache, returning the names of the caches
    /// that actually held data for it
    pub fn remove_all(&mut self, entity: Entity) -> PurgedComponents {
        let mut purged = PurgedComponents::new();
        for cache in &mut self.caches {
            if cache.remove_entity(entity) {
                purged.push(cache.component_name());
            }
        }
        purged
    }

    /// Number of registered component types
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Type-erased caches in registration order
    pub fn caches(&self) -> impl Iterator<Item = &dyn ErasedCache> + '_ {
        self.caches.iter().map(|cache| cache.as_ref())
    }

    /// Empty every cache, keeping registrations
    pub fn clear(&mut self) {
        for cache in &mut self.caches {
            cache.clear();
        }
    }
}

#[cold]
#[track_caller]
fn unregistered<T: Component>() -> ! {
    panic!(
        "component type {} used before register_component",
        component_name::<T>()
    )
}
