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

//! World tuning knobs
//!
//! Loaded once at startup. The defaults mirror the values the simulation has
//! always shipped with; none of them has a derivation, so they stay tunable.

use serde::{Deserialize, Serialize};

use crate::entity::MAX_SLOTS;
use crate::error::{EcsError, Result};

/// Freed indices that must accumulate before slots are recycled
pub const DEFAULT_REUSE_THRESHOLD: usize = 32;

/// Initial logical capacity of the free index queue
pub const DEFAULT_FREE_QUEUE_CAPACITY: usize = 64;

/// Multiplier applied when the free index queue overflows
pub const DEFAULT_FREE_QUEUE_GROWTH: usize = 2;

/// Warn once a recycled generation gets this close to its maximum
pub const DEFAULT_GENERATION_WARN_MARGIN: u8 = 8;

pub const DEFAULT_INITIAL_ENTITY_CAPACITY: usize = 256;

/// Configuration for a [`World`](crate::world::World)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub reuse_threshold: usize,
    pub free_queue_capacity: usize,
    pub free_queue_growth: usize,
    pub generation_warn_margin: u8,
    pub initial_entity_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            reuse_threshold: DEFAULT_REUSE_THRESHOLD,
            free_queue_capacity: DEFAULT_FREE_QUEUE_CAPACITY,
            free_queue_growth: DEFAULT_FREE_QUEUE_GROWTH,
            generation_warn_margin: DEFAULT_GENERATION_WARN_MARGIN,
            initial_entity_capacity: DEFAULT_INITIAL_ENTITY_CAPACITY,
        }
    }
}

impl WorldConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EcsError::Config(format!("Failed to parse world config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the allocator cannot honour.
    ///
    /// Both capacities must lie in `1..=MAX_SLOTS`: an entity index has
    /// [`INDEX_BITS`](crate::entity::INDEX_BITS) bits, so neither table can
    /// usefully hold more.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SLOTS).contains(&self.free_queue_capacity) {
            return Err(EcsError::Config(format!(
                "free_queue_capacity must be in 1..={MAX_SLOTS}, got {}",
                self.free_queue_capacity
            )));
        }
        if !(1..=MAX_SLOTS).contains(&self.initial_entity_capacity) {
            return Err(EcsError::Config(format!(
                "initial_entity_capacity must be in 1..={MAX_SLOTS}, got {}",
                self.initial_entity_capacity
            )));
        }
        if self.free_queue_growth < 2 {
            return Err(EcsError::Config(format!(
                "free_queue_growth must be at least 2, got {}",
                self.free_queue_growth
            )));
        }
        Ok(())
    }
}
