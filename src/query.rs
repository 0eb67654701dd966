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

//! Query iterators over component caches and tag sets
//!
//! All iterators are lazy, forward-only walks over storage. Order is
//! storage order, which swap-remove reshuffles, so callers must not rely on
//! insertion order. Dropping an iterator early is always fine.
//!
//! Each iterator borrows the [`World`](crate::world::World) for its whole
//! lifetime, so structural changes cannot happen mid-walk. Queue them in a
//! [`CommandBuffer`](crate::command::CommandBuffer) instead, or iterate over
//! a snapshot from `entities_with`.

use std::collections::hash_set;
use std::iter::{FusedIterator, Zip};
use std::slice;

use crate::component::Component;
use crate::entity::Entity;
use crate::storage::ComponentCache;

/// Mutable walk over `(component, owner)` pairs of one cache
pub struct EachComponentMut<'a, T: Component> {
    inner: Zip<slice::IterMut<'a, T>, slice::Iter<'a, Entity>>,
}

impl<'a, T: Component> EachComponentMut<'a, T> {
    pub(crate) fn new(cache: &'a mut ComponentCache<T>) -> Self {
        let (components, entities) = cache.split_mut();
        Self {
            inner: components.iter_mut().zip(entities.iter()),
        }
    }
}

impl<'a, T: Component> Iterator for EachComponentMut<'a, T> {
    type Item = (&'a mut T, Entity);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(component, &entity)| (component, entity))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Component> ExactSizeIterator for EachComponentMut<'_, T> {}
impl<T: Component> FusedIterator for EachComponentMut<'_, T> {}

/// Shared walk over `(component, owner)` pairs of one cache
pub struct EachComponent<'a, T: Component> {
    inner: Zip<slice::Iter<'a, T>, slice::Iter<'a, Entity>>,
}

impl<'a, T: Component> EachComponent<'a, T> {
    pub(crate) fn new(cache: &'a ComponentCache<T>) -> Self {
        Self {
            inner: cache.components().iter().zip(cache.entities().iter()),
        }
    }
}

impl<'a, T: Component> Iterator for EachComponent<'a, T> {
    type Item = (&'a T, Entity);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(component, &entity)| (component, entity))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Component> ExactSizeIterator for EachComponent<'_, T> {}
impl<T: Component> FusedIterator for EachComponent<'_, T> {}

/// Entities owning a component of one type
pub struct EachEntityWith<'a> {
    inner: slice::Iter<'a, Entity>,
}

impl<'a> EachEntityWith<'a> {
    pub(crate) fn new<T: Component>(cache: &'a ComponentCache<T>) -> Self {
        Self {
            inner: cache.entities().iter(),
        }
    }
}

impl Iterator for EachEntityWith<'_> {
    type Item = Entity;

    #[inline]
    fn next(&mut self) -> Option<Entity> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for EachEntityWith<'_> {}
impl FusedIterator for EachEntityWith<'_> {}

/// Members of one tag set. Empty when the tag is unregistered.
pub struct EachEntityWithTag<'a> {
    inner: Option<hash_set::Iter<'a, Entity>>,
}

impl<'a> EachEntityWithTag<'a> {
    pub(crate) fn new(inner: Option<hash_set::Iter<'a, Entity>>) -> Self {
        Self { inner }
    }
}

impl Iterator for EachEntityWithTag<'_> {
    type Item = Entity;

    #[inline]
    fn next(&mut self) -> Option<Entity> {
        self.inner.as_mut()?.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(iter) => iter.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl ExactSizeIterator for EachEntityWithTag<'_> {}
impl FusedIterator for EachEntityWithTag<'_> {}
