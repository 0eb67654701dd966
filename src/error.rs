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

//! Error types
//!
//! These are the recoverable failures: stale handles, missing components,
//! bad configuration. Using a component type that was never registered is a
//! setup bug and panics instead.

use std::fmt;

use crate::entity::Entity;
use crate::tag::Tag;

/// ECS error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Entity handle is not alive (destroyed or never issued)
    EntityNotFound(Entity),

    /// The invalid sentinel handle was used
    InvalidEntity,

    /// Entity is alive but has no component of this type
    ComponentNotFound {
        entity: Entity,
        component: &'static str,
    },

    /// Component type was never registered
    ComponentNotRegistered(&'static str),

    /// Tag id was never handed out by this world
    TagNotRegistered(Tag),

    /// Invalid or unreadable configuration
    Config(String),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::EntityNotFound(entity) => write!(f, "Entity not found: {entity}"),
            EcsError::InvalidEntity => write!(f, "Invalid entity ID"),
            EcsError::ComponentNotFound { entity, component } => {
                write!(f, "Component {component} not found on entity {entity}")
            }
            EcsError::ComponentNotRegistered(name) => {
                write!(f, "Component type not registered: {name}")
            }
            EcsError::TagNotRegistered(tag) => write!(f, "Tag not registered: {tag:?}"),
            EcsError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for EcsError {}

impl From<serde_json::Error> for EcsError {
    fn from(err: serde_json::Error) -> Self {
        EcsError::Config(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EcsError>;
