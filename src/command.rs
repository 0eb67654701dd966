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

//! Deferred structural mutations
//!
//! Systems walking a cache hold a borrow of the world, so they record
//! creates, removals and tag changes here and the world replays them once
//! the walk is over.

use crate::component::Component;
use crate::entity::Entity;
use crate::tag::Tag;
use crate::world::World;

/// Type alias for world mutation closures
pub type CommandClosure = Box<dyn FnOnce(&mut World)>;

/// Deferred command for world mutations
pub enum Command {
    /// Create an entity and hand it to a setup closure
    CreateEntity(Box<dyn FnOnce(&mut World, Entity)>),

    RemoveEntity(Entity),

    AddTag(Entity, Tag),

    RemoveTag(Entity, Tag),

    /// Custom world mutation
    Custom(CommandClosure),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::CreateEntity(_) => write!(f, "CreateEntity(...)"),
            Command::RemoveEntity(e) => f.debug_tuple("RemoveEntity").field(e).finish(),
            Command::AddTag(e, t) => f.debug_tuple("AddTag").field(e).field(t).finish(),
            Command::RemoveTag(e, t) => f.debug_tuple("RemoveTag").field(e).field(t).finish(),
            Command::Custom(_) => write!(f, "Custom(...)"),
        }
    }
}

/// FIFO of deferred commands
#[derive(Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Queue an entity creation; `setup` runs with the new handle once applied
    pub fn create_entity<F>(&mut self, setup: F)
    where
        F: FnOnce(&mut World, Entity) + 'static,
    {
        self.commands.push(Command::CreateEntity(Box::new(setup)));
    }

    pub fn remove_entity(&mut self, entity: Entity) {
        self.commands.push(Command::RemoveEntity(entity));
    }

    /// Queue attaching `value` (overwrites an existing component)
    pub fn insert_component<T: Component>(&mut self, entity: Entity, value: T) {
        self.add(move |world| {
            world.insert_component(entity, value);
        });
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) {
        self.add(move |world| world.remove_component::<T>(entity));
    }

    pub fn add_tag(&mut self, entity: Entity, tag: Tag) {
        self.commands.push(Command::AddTag(entity, tag));
    }

    pub fn remove_tag(&mut self, entity: Entity, tag: Tag) {
        self.commands.push(Command::RemoveTag(entity, tag));
    }

    /// Queue a custom world mutation
    pub fn add<F>(&mut self, f: F)
    where
        F: FnOnce(&mut World) + 'static,
    {
        self.commands.push(Command::Custom(Box::new(f)));
    }

    /// Replay every queued command in order and leave the buffer empty
    pub fn apply(&mut self, world: &mut World) {
        for command in self.commands.drain(..) {
            match command {
                Command::CreateEntity(setup) => {
                    let entity = world.create_entity();
                    setup(world, entity);
                }
                Command::RemoveEntity(entity) => world.remove_entity(entity),
                Command::AddTag(entity, tag) => world.add_tag(entity, tag),
                Command::RemoveTag(entity, tag) => world.remove_tag(entity, tag),
                Command::Custom(f) => f(world),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
