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

//! Boolean entity tags
//!
//! A [`Tag`] is a small integer naming a membership set. Tags cost nothing
//! per entity beyond set membership. Tag 0 is never handed out so that a
//! default-constructed `Tag` is recognisably unregistered.

use ahash::AHashSet;
use tracing::debug;

use crate::entity::Entity;
use crate::query::EachEntityWithTag;

/// Registered boolean category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Tag(u32);

impl Tag {
    /// Never registered
    pub const NONE: Tag = Tag(0);

    pub fn id(self) -> u32 {
        self.0
    }
}

/// Membership sets for every registered tag
#[derive(Debug, Default, Clone)]
pub struct TagStore {
    /// `sets[i]` backs `Tag(i + 1)`
    sets: Vec<AHashSet<Entity>>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new empty tag
    pub fn register(&mut self) -> Tag {
        self.sets.push(AHashSet::new());
        let tag = Tag(self.sets.len() as u32);
        debug!(tag = tag.0, "registered tag");
        tag
    }

    pub fn is_registered(&self, tag: Tag) -> bool {
        self.slot(tag).is_some()
    }

    fn slot(&self, tag: Tag) -> Option<usize> {
        let idx = (tag.0 as usize).checked_sub(1)?;
        (idx < self.sets.len()).then_some(idx)
    }

    fn set(&self, tag: Tag) -> Option<&AHashSet<Entity>> {
        self.slot(tag).map(|idx| &self.sets[idx])
    }

    fn set_mut(&mut self, tag: Tag) -> Option<&mut AHashSet<Entity>> {
        let idx = self.slot(tag)?;
        Some(&mut self.sets[idx])
    }

    /// Add `entity` to `tag`. Returns false if the tag is unknown or the entity already had it.
    pub fn add(&mut self, entity: Entity, tag: Tag) -> bool {
        match self.set_mut(tag) {
            Some(set) => set.insert(entity),
            None => {
                debug!(%entity, tag = tag.0, "add_tag on unregistered tag");
                false
            }
        }
    }

    /// Remove `entity` from `tag`. Returns whether it was a member.
    pub fn remove(&mut self, entity: Entity, tag: Tag) -> bool {
        match self.set_mut(tag) {
            Some(set) => set.remove(&entity),
            None => {
                debug!(%entity, tag = tag.0, "remove_tag on unregistered tag");
                false
            }
        }
    }

    pub fn has(&self, entity: Entity, tag: Tag) -> bool {
        match self.set(tag) {
            Some(set) => set.contains(&entity),
            None => {
                debug!(%entity, tag = tag.0, "has_tag on unregistered tag");
                false
            }
        }
    }

    /// Drop `entity` from every tag set, returning how many it belonged to
    pub fn remove_all(&mut self, entity: Entity) -> usize {
        self.sets
            .iter_mut()
            .map(|set| set.remove(&entity))
            .filter(|&removed| removed)
            .count()
    }

    /// Members of `tag` in unspecified order; empty for an unregistered tag
    pub fn members(&self, tag: Tag) -> EachEntityWithTag<'_> {
        EachEntityWithTag::new(self.set(tag).map(|set| set.iter()))
    }

    pub fn count(&self, tag: Tag) -> usize {
        self.set(tag).map_or(0, |set| set.len())
    }

    /// Number of registered tags
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Registered tags in registration order
    pub fn tags(&self) -> impl Iterator<Item = Tag> {
        (1..=self.sets.len() as u32).map(Tag)
    }

    /// Empty every set, keeping registrations
    pub fn clear(&mut self) {
        for set in &mut self.sets {
            set.clear();
        }
    }
}
