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

//! Per-type sparse-set component storage
//!
//! Each [`ComponentCache`] keeps its values packed in a dense `Vec<T>`, a
//! parallel `Vec<Entity>` recording which entity owns each row, and a hash
//! index from entity to row. Removal swaps the last row into the hole so the
//! arrays never have gaps.

use std::any::Any;

use rustc_hash::FxHashMap;

use crate::component::{component_name, Component};
use crate::entity::Entity;

/// Dense storage for one component type
pub struct ComponentCache<T: Component> {
    components: Vec<T>,
    /// Owner of `components[i]`
    entities: Vec<Entity>,
    index: FxHashMap<Entity, usize>,
}

impl<T: Component> ComponentCache<T> {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            entities: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            components: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Attach a default-valued component to `entity`, or return the one it already has.
    ///
    /// Liveness is the caller's concern; the cache only knows handles.
    pub fn insert_default(&mut self, entity: Entity) -> &mut T {
        let row = match self.index.get(&entity) {
            Some(&row) => row,
            None => {
                let row = self.components.len();
                self.components.push(T::default());
                self.entities.push(entity);
                self.index.insert(entity, row);
                row
            }
        };
        &mut self.components[row]
    }

    /// Attach `value` to `entity`, overwriting any existing component
    pub fn insert(&mut self, entity: Entity, value: T) -> &mut T {
        let slot = self.insert_default(entity);
        *slot = value;
        slot
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        let row = *self.index.get(&entity)?;
        self.components.get(row)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let row = *self.index.get(&entity)?;
        self.components.get_mut(row)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Row currently holding `entity`'s component
    pub fn row_of(&self, entity: Entity) -> Option<usize> {
        self.index.get(&entity).copied()
    }

    /// Detach and return `entity`'s component, keeping storage dense.
    ///
    /// The last row moves into the vacated one and its index entry is
    /// repointed, so removal never shifts more than one element.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let row = self.index.remove(&entity)?;
        let last = self.components.len() - 1;

        let removed = self.components.swap_remove(row);
        self.entities.swap_remove(row);

        if row != last {
            let moved = self.entities[row];
            self.index.insert(moved, row);
        }

        debug_assert_eq!(self.components.len(), self.entities.len());
        debug_assert_eq!(self.components.len(), self.index.len());
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Dense component values in storage order
    pub fn components(&self) -> &[T] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.components
    }

    /// Owning entities, parallel to [`components`](Self::components)
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Split borrow used by the mutable query iterators
    pub(crate) fn split_mut(&mut self) -> (&mut [T], &[Entity]) {
        (&mut self.components, &self.entities)
    }

    pub fn clear(&mut self) {
        self.components.clear();
        self.entities.clear();
        self.index.clear();
    }

    /// Check that every index entry points at a row owned by that entity
    pub fn is_consistent(&self) -> bool {
        self.components.len() == self.entities.len()
            && self.index.len() == self.entities.len()
            && self
                .index
                .iter()
                .all(|(&entity, &row)| self.entities.get(row) == Some(&entity))
    }
}

impl<T: Component> Default for ComponentCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentCache`]
///
/// Exposes what the registry needs without knowing `T`: purging an entity on
/// destruction, diagnostics, and downcasting back to the typed cache.
pub trait ErasedCache: Any {
    /// Drop `entity`'s component if it has one. Returns whether anything was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn contains_entity(&self, entity: Entity) -> bool;

    /// Owners in storage order
    fn owners(&self) -> &[Entity];

    fn is_consistent(&self) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedCache for ComponentCache<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn owners(&self) -> &[Entity] {
        &self.entities
    }

    fn is_consistent(&self) -> bool {
        ComponentCache::<T>::is_consistent(self)
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn clear(&mut self) {
        ComponentCache::<T>::clear(self);
    }

    fn component_name(&self) -> &'static str {
        component_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
