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

//! Entity handles and the generational slot allocator.
//!
//! An [`Entity`] packs a slot index and a generation into a single `u32`.
//! The allocator hands out fresh slots until enough freed indices have
//! piled up in the [`FreeQueue`], then starts recycling them with a bumped
//! generation so that stale handles stop matching.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::config::WorldConfig;

/// Number of low bits holding the slot index.
pub const INDEX_BITS: u32 = 24;

/// Number of high bits holding the generation.
pub const GENERATION_BITS: u32 = 8;

const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

/// Largest slot index an entity can address.
pub const MAX_INDEX: u32 = INDEX_MASK;

/// Slots an allocator can ever hold, the reserved sentinel slot included.
pub const MAX_SLOTS: usize = MAX_INDEX as usize + 1;

/// Largest generation value before the counter wraps.
pub const MAX_GENERATION: u8 = u8::MAX;

/// Opaque generational entity handle.
///
/// Equality is by raw value: two handles for the same slot but different
/// generations are different entities.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Entity(u32);

impl Entity {
    /// The all-zero sentinel. Never issued by an allocator.
    pub const INVALID: Entity = Entity(0);

    pub(crate) fn new(index: u32, generation: u8) -> Self {
        debug_assert!(index <= MAX_INDEX, "entity index {index} out of range");
        Entity((u32::from(generation) << INDEX_BITS) | (index & INDEX_MASK))
    }

    /// Slot index in the allocator's table
    #[inline]
    pub fn index(self) -> u32 {
        self.0 & INDEX_MASK
    }

    /// Generation stamped when this handle was issued
    #[inline]
    pub fn generation(self) -> u8 {
        (self.0 >> INDEX_BITS) as u8
    }

    #[inline]
    pub fn to_bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        Entity(bits)
    }

    /// True unless this is [`Entity::INVALID`]. Says nothing about liveness.
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Entity({}v{})", self.index(), self.generation())
        } else {
            write!(f, "Entity(INVALID)")
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// FIFO of slot indices waiting to be recycled.
///
/// Bounded by a logical capacity that grows by a multiplicative factor when a
/// push would overflow it.
#[derive(Debug, Clone)]
pub struct FreeQueue {
    indices: VecDeque<u32>,
    capacity: usize,
    growth: usize,
}

impl FreeQueue {
    /// Out-of-range arguments are clamped rather than rejected: `capacity`
    /// into `1..=MAX_SLOTS` and `growth` to at least 2. Use
    /// [`WorldConfig::validate`] to reject them up front instead.
    pub fn with_capacity(capacity: usize, growth: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_SLOTS);
        Self {
            indices: VecDeque::with_capacity(capacity),
            capacity,
            growth: growth.max(2),
        }
    }

    /// Queue an index, growing the queue if it is full
    pub fn push(&mut self, index: u32) {
        if self.indices.len() >= self.capacity {
            // No more than MAX_SLOTS indices can ever be free at once
            let grown = self.capacity.saturating_mul(self.growth).min(MAX_SLOTS);
            debug!(
                from = self.capacity,
                to = grown,
                "free index queue full, growing"
            );
            self.indices.reserve(grown.saturating_sub(self.indices.len()));
            self.capacity = grown;
        }
        self.indices.push_back(index);
    }

    pub fn pop(&mut self) -> Option<u32> {
        self.indices.pop_front()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Current logical capacity (not the backing allocation)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

/// Issues and recycles [`Entity`] handles.
#[derive(Debug, Clone)]
pub struct EntityAllocator {
    /// Currently issued handle per slot, `Entity::INVALID` when freed.
    slots: Vec<Entity>,
    /// Generation to stamp the next time a slot is reused.
    generations: Vec<u8>,
    free: FreeQueue,
    reuse_threshold: usize,
    generation_warn_margin: u8,
    live: usize,
    recycled: usize,
    generation_wraps: usize,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::with_config(&WorldConfig::default())
    }

    /// Build an allocator from `config` without validating it.
    ///
    /// Capacities are clamped into `1..=MAX_SLOTS` and growth to at least 2,
    /// the same way [`FreeQueue::with_capacity`] does. [`World::with_config`]
    /// runs [`WorldConfig::validate`] first and reports bad values as errors.
    ///
    /// [`World::with_config`]: crate::world::World::with_config
    pub fn with_config(config: &WorldConfig) -> Self {
        let capacity = config.initial_entity_capacity.clamp(1, MAX_SLOTS);
        let mut slots = Vec::with_capacity(capacity);
        let mut generations = Vec::with_capacity(capacity);

        // Slot 0 is reserved so the all-zero handle is never issued
        slots.push(Entity::INVALID);
        generations.push(0);

        Self {
            slots,
            generations,
            free: FreeQueue::with_capacity(config.free_queue_capacity, config.free_queue_growth),
            reuse_threshold: config.reuse_threshold,
            generation_warn_margin: config.generation_warn_margin,
            live: 0,
            recycled: 0,
            generation_wraps: 0,
        }
    }

    /// Issue a new entity handle.
    ///
    /// # Panics
    /// Panics if every addressable slot index is in use.
    pub fn create(&mut self) -> Entity {
        let entity = if self.free.len() >= self.reuse_threshold {
            self.recycle()
        } else {
            self.grow()
        };
        self.live += 1;
        entity
    }

    fn grow(&mut self) -> Entity {
        let index = self.slots.len();
        if index > MAX_INDEX as usize {
            panic!("Entity index exhaustion: {index:#x} slots allocated");
        }
        let entity = Entity::new(index as u32, 0);
        self.slots.push(entity);
        self.generations.push(0);
        trace!(%entity, "allocated fresh slot");
        entity
    }

    fn recycle(&mut self) -> Entity {
        // Caller checked len >= reuse_threshold, and the threshold may be 0
        let Some(index) = self.free.pop() else {
            return self.grow();
        };
        let slot = index as usize;

        let (generation, wrapped) = self.generations[slot].overflowing_add(1);
        if wrapped {
            self.generation_wraps += 1;
        }
        if generation >= MAX_GENERATION.saturating_sub(self.generation_warn_margin) || wrapped {
            warn!(
                index,
                generation,
                wrapped,
                "entity generation counter near exhaustion; stale handles may alias"
            );
        }
        self.generations[slot] = generation;

        let entity = Entity::new(index, generation);
        self.slots[slot] = entity;
        self.recycled += 1;
        trace!(%entity, "recycled slot");
        entity
    }

    /// Invalidate `entity`'s slot and queue the index for reuse.
    ///
    /// Returns `false` (and does nothing) if the handle is not alive.
    pub fn remove(&mut self, entity: Entity) -> bool {
        if !self.alive(entity) {
            debug!(%entity, "ignoring removal of dead entity");
            return false;
        }
        let index = entity.index();
        self.slots[index as usize] = Entity::INVALID;
        self.free.push(index);
        self.live -= 1;
        true
    }

    /// `entity` is not the sentinel and its slot currently holds exactly it
    #[inline]
    pub fn alive(&self, entity: Entity) -> bool {
        entity.is_valid()
            && self
                .slots
                .get(entity.index() as usize)
                .is_some_and(|&slot| slot == entity)
    }

    /// Every currently live handle, in slot order
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().copied().filter(|e| e.is_valid())
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Slots ever allocated, excluding the reserved sentinel slot
    pub fn slot_count(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn recycled_count(&self) -> usize {
        self.recycled
    }

    /// How many times a slot's generation counter has wrapped past its maximum
    pub fn generation_wraps(&self) -> usize {
        self.generation_wraps
    }

    pub fn reuse_threshold(&self) -> usize {
        self.reuse_threshold
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocator_with_threshold(reuse_threshold: usize) -> EntityAllocator {
        EntityAllocator::with_config(&WorldConfig {
            reuse_threshold,
            ..WorldConfig::default()
        })
    }

    #[test]
    fn test_entity_packing() {
        let e = Entity::new(1234, 7);
        assert_eq!(e.index(), 1234);
        assert_eq!(e.generation(), 7);
        assert_eq!(Entity::from_bits(e.to_bits()), e);
        assert!(!Entity::INVALID.is_valid());
        assert_eq!(Entity::default(), Entity::INVALID);
    }

    #[test]
    fn test_never_issues_sentinel() {
        let mut alloc = EntityAllocator::new();
        let first = alloc.create();
        assert_ne!(first, Entity::INVALID);
        assert_eq!(first.index(), 1);
        assert!(!alloc.alive(Entity::INVALID));
    }

    #[test]
    fn test_create_remove_alive() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.create();
        let b = alloc.create();
        assert!(alloc.alive(a));
        assert!(alloc.alive(b));

        assert!(alloc.remove(a));
        assert!(!alloc.alive(a));
        assert!(alloc.alive(b));
        assert_eq!(alloc.live_count(), 1);
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.create();
        assert!(alloc.remove(a));
        assert!(!alloc.remove(a));
        assert_eq!(alloc.free_count(), 1);
        assert_eq!(alloc.live_count(), 0);
    }

    #[test]
    fn test_reuse_waits_for_threshold() {
        let mut alloc = allocator_with_threshold(4);
        let handles: Vec<_> = (0..4).map(|_| alloc.create()).collect();

        // Three freed indices stay below the threshold: fresh slots are issued
        for &e in &handles[..3] {
            alloc.remove(e);
        }
        let fresh = alloc.create();
        assert_eq!(fresh.index(), 5);
        assert_eq!(fresh.generation(), 0);

        // Fourth freed index reaches the threshold: oldest freed index comes back first
        alloc.remove(handles[3]);
        let reused = alloc.create();
        assert_eq!(reused.index(), handles[0].index());
        assert_eq!(reused.generation(), 1);
        assert_eq!(alloc.recycled_count(), 1);
    }

    #[test]
    fn test_generation_distinctness() {
        let mut alloc = allocator_with_threshold(0);
        let e1 = alloc.create();
        alloc.remove(e1);
        let e2 = alloc.create();

        assert_eq!(e1.index(), e2.index());
        assert_ne!(e1, e2);
        assert!(!alloc.alive(e1));
        assert!(alloc.alive(e2));
    }

    #[test]
    fn test_generation_wraps_are_counted() {
        let mut alloc = allocator_with_threshold(0);
        let mut e = alloc.create();
        for _ in 0..=u8::MAX as usize {
            alloc.remove(e);
            e = alloc.create();
        }
        assert_eq!(alloc.generation_wraps(), 1);
        assert_eq!(e.generation(), 0);
        assert!(alloc.alive(e));
    }

    #[test]
    fn test_free_queue_clamps_arguments() {
        let mut queue = FreeQueue::with_capacity(0, 0);
        assert_eq!(queue.capacity(), 1);
        queue.push(7);
        queue.push(8);
        assert_eq!(queue.capacity(), 2);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_allocator_clamps_unvalidated_config() {
        let config = WorldConfig {
            initial_entity_capacity: 0,
            free_queue_capacity: 0,
            free_queue_growth: 0,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());

        let mut alloc = EntityAllocator::with_config(&config);
        let e = alloc.create();
        assert!(alloc.alive(e));
        assert!(alloc.remove(e));
        assert_eq!(alloc.free_count(), 1);
    }

    #[cfg(feature = "profiling")]
    #[test]
    fn test_generation_exhaustion_warns() {
        use tracing::Level;

        use crate::config::DEFAULT_GENERATION_WARN_MARGIN;
        use crate::log_capture::EventLog;

        let log = EventLog::default();
        let mut alloc = allocator_with_threshold(0);
        let warn_from = MAX_GENERATION - DEFAULT_GENERATION_WARN_MARGIN;

        log.capture(|| {
            let mut e = alloc.create();
            while e.generation() < warn_from - 1 {
                alloc.remove(e);
                e = alloc.create();
            }
            assert_eq!(log.count(Level::WARN), 0);

            alloc.remove(e);
            e = alloc.create();
            assert_eq!(e.generation(), warn_from);
            assert_eq!(log.count(Level::WARN), 1);

            // Every recycle from here to the wrap keeps warning
            while alloc.generation_wraps() == 0 {
                alloc.remove(e);
                e = alloc.create();
            }
        });

        let warnings = log.messages(Level::WARN);
        assert_eq!(warnings.len(), usize::from(MAX_GENERATION - warn_from) + 2);
        assert!(warnings
            .iter()
            .all(|m| m.contains("entity generation counter near exhaustion")));
    }

    #[test]
    fn test_free_queue_grows() {
        let mut queue = FreeQueue::with_capacity(2, 2);
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.capacity(), 4);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_iter_alive() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.create();
        let b = alloc.create();
        let c = alloc.create();
        alloc.remove(b);
        let alive: Vec<_> = alloc.iter_alive().collect();
        assert_eq!(alive, vec![a, c]);
    }
}
